//! Property-based tests for queued_logger using proptest

use proptest::prelude::*;
use queued_logger::prelude::*;
use queued_logger::{MaskRule, Message};

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that parsing ignores case
    #[test]
    fn test_log_level_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let text = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        prop_assert_eq!(text.parse::<LogLevel>().unwrap(), level);
    }

    /// Test that ordering follows severity
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a < b, (a as u8) < (b as u8));
    }
}

// ============================================================================
// Masking Tests
// ============================================================================

proptest! {
    /// Test that a whole-match rule removes every occurrence of a literal
    #[test]
    fn test_mask_removes_literal(
        prefix in "[a-z ]{0,20}",
        suffix in "[a-z ]{0,20}",
    ) {
        let rule = MaskRule::new("SECRET42", "", 0).unwrap();
        let text = format!("{}SECRET42{}SECRET42", prefix, suffix);

        let masked = rule.apply(&text);
        prop_assert!(!masked.contains("SECRET42"));
        prop_assert_eq!(masked.matches("********").count(), 2);
    }

    /// Test that text without a match is returned untouched
    #[test]
    fn test_mask_leaves_unmatched_text(text in "[a-z ]{0,40}") {
        let registry = MaskRegistry::new();
        registry.add_pattern_mask(r"\d+", "#", 0).unwrap();
        prop_assert_eq!(registry.apply(&text).into_owned(), text);
    }

    /// Test that masking only the group keeps the surrounding match
    #[test]
    fn test_mask_group_keeps_context(value in "[A-Za-z0-9]{1,16}") {
        let registry = MaskRegistry::new();
        registry.add_pattern_mask(r"key=(\w+)", "", 1).unwrap();

        let masked = registry.apply(&format!("key={} end", value)).into_owned();
        prop_assert_eq!(masked, "key=******** end".to_string());
    }
}

// ============================================================================
// Message Tests
// ============================================================================

proptest! {
    /// Test that any text passes through a Message unchanged
    #[test]
    fn test_message_preserves_text(text in ".*") {
        prop_assert_eq!(Message::from(text.as_str()).into_text(), text);
    }

    /// Test that present optional text is never rendered as null
    #[test]
    fn test_optional_message(text in proptest::option::of(".*")) {
        let message = Message::from(text.clone());
        prop_assert_eq!(message.is_null(), text.is_none());
        prop_assert_eq!(message.into_text(), text.unwrap_or_else(|| "<null>".to_string()));
    }
}
