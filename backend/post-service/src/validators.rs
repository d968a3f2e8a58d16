use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidationError;

/// Code points allowed anywhere inside an emoji grapheme: pictographs plus
/// joiners, variation selectors, skin tones, keycaps, flags and tags.
static EMOJI_GRAPHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Extended_Pictographic}\p{Emoji_Component}]+$")
        .expect("emoji grapheme pattern is valid")
});

/// A grapheme needs one of these to render as an emoji; `#`, `*` and the
/// digits are emoji components only as part of a keycap sequence.
static EMOJI_BASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\x{1F1E6}-\x{1F1FF}\x{20E3}]")
        .expect("emoji base pattern is valid")
});

/// Check that every grapheme cluster of `content` is an emoji.
///
/// Whitespace, letters and bare digits fail. The empty string passes;
/// minimum length is enforced separately.
pub fn is_emoji_only(content: &str) -> bool {
    content
        .graphemes(true)
        .all(|grapheme| EMOJI_GRAPHEME.is_match(grapheme) && EMOJI_BASE.is_match(grapheme))
}

/// `validator` adapter for [`is_emoji_only`].
pub fn validate_emoji_only(content: &str) -> Result<(), ValidationError> {
    if is_emoji_only(content) {
        Ok(())
    } else {
        Err(ValidationError::new("emoji_only").with_message(Cow::Borrowed("Only emojis are allowed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_single_and_repeated_emoji() {
        assert!(is_emoji_only("🔥"));
        assert!(is_emoji_only("🦀🦀🦀"));
        assert!(is_emoji_only("©"));
    }

    #[test]
    fn accepts_multi_code_point_sequences() {
        // ZWJ family
        assert!(is_emoji_only("👨\u{200D}👩\u{200D}👧"));
        // skin tone
        assert!(is_emoji_only("👍🏽"));
        // flag
        assert!(is_emoji_only("🇺🇸"));
        // keycap
        assert!(is_emoji_only("1\u{FE0F}\u{20E3}"));
        // variation selector
        assert!(is_emoji_only("❤\u{FE0F}"));
    }

    #[test]
    fn rejects_text_and_whitespace() {
        assert!(!is_emoji_only("hello"));
        assert!(!is_emoji_only("🔥 🔥"));
        assert!(!is_emoji_only("🔥a"));
        assert!(!is_emoji_only("\n"));
    }

    #[test]
    fn rejects_bare_emoji_components() {
        assert!(!is_emoji_only("123"));
        assert!(!is_emoji_only("#"));
        assert!(!is_emoji_only("*"));
    }

    #[test]
    fn validator_error_carries_code_and_message() {
        let err = validate_emoji_only("nope").unwrap_err();
        assert_eq!(err.code, "emoji_only");
        assert_eq!(err.message.as_deref(), Some("Only emojis are allowed"));
        assert!(validate_emoji_only("😀").is_ok());
    }
}
