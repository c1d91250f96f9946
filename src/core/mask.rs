//! Ordered text masking applied before messages reach a sink
//!
//! Rules are applied in registration order, each one scanning the output
//! of the previous rule. The active rule list is published as an immutable
//! snapshot, so the drain worker reads it without taking a lock.

use super::error::{LoggerError, Result};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use regex::Regex;
use std::borrow::Cow;
use std::sync::Arc;

/// Replacement used when a rule is registered with a blank one
pub const DEFAULT_REPLACEMENT: &str = "********";

/// A pattern/replacement/capture-group triple
#[derive(Debug, Clone)]
pub struct MaskRule {
    pattern: Regex,
    replacement: String,
    capture_group: usize,
}

impl MaskRule {
    /// Compile a rule
    ///
    /// `capture_group == 0` replaces each whole match; any other value
    /// replaces only that group's span inside each match.
    pub fn new(pattern: &str, replacement: &str, capture_group: usize) -> Result<Self> {
        let compiled =
            Regex::new(pattern).map_err(|e| LoggerError::invalid_pattern(pattern, e))?;

        // captures_len counts the implicit whole-match group
        let available = compiled.captures_len() - 1;
        if capture_group > available {
            return Err(LoggerError::invalid_capture_group(
                pattern,
                capture_group,
                available,
            ));
        }

        let replacement = if replacement.trim().is_empty() {
            DEFAULT_REPLACEMENT.to_string()
        } else {
            replacement.to_string()
        };

        Ok(Self {
            pattern: compiled,
            replacement,
            capture_group,
        })
    }

    /// Source text of the pattern; rules are keyed by it
    pub fn source(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn capture_group(&self) -> usize {
        self.capture_group
    }

    /// Apply this rule to `text`, borrowing when nothing matched
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut output = String::new();
        let mut last = 0;
        let mut replaced = false;

        for captures in self.pattern.captures_iter(text) {
            // A group that did not take part in this match leaves it intact
            let Some(span) = captures.get(self.capture_group) else {
                continue;
            };
            output.push_str(&text[last..span.start()]);
            output.push_str(&self.replacement);
            last = span.end();
            replaced = true;
        }

        if !replaced {
            return Cow::Borrowed(text);
        }
        output.push_str(&text[last..]);
        Cow::Owned(output)
    }
}

/// Append-only, ordered set of mask rules
pub struct MaskRegistry {
    rules: ArcSwap<Vec<MaskRule>>,
    write_lock: Mutex<()>,
}

impl MaskRegistry {
    pub fn new() -> Self {
        Self {
            rules: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Register a rule, returning `false` when its pattern is already known
    ///
    /// The first registration of a pattern wins; duplicates change nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use queued_logger::MaskRegistry;
    ///
    /// let masks = MaskRegistry::new();
    /// assert!(masks.add_pattern_mask(r"password=(\S+)", "****", 1).unwrap());
    /// assert!(!masks.add_pattern_mask(r"password=(\S+)", "xxxx", 0).unwrap());
    ///
    /// assert_eq!(masks.apply("password=secret123 ok"), "password=**** ok");
    /// ```
    pub fn add_pattern_mask(
        &self,
        pattern: &str,
        replacement: &str,
        capture_group: usize,
    ) -> Result<bool> {
        let _guard = self.write_lock.lock();

        let current = self.rules.load();
        if current.iter().any(|rule| rule.source() == pattern) {
            return Ok(false);
        }

        let rule = MaskRule::new(pattern, replacement, capture_group)?;
        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(rule);
        self.rules.store(Arc::new(next));
        Ok(true)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.load().len()
    }

    /// The currently published rule list
    pub fn snapshot(&self) -> Arc<Vec<MaskRule>> {
        self.rules.load_full()
    }

    /// Run every rule, in registration order, over `text`
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let rules = self.rules.load();
        let mut current = Cow::Borrowed(text);

        for rule in rules.iter() {
            let masked = match rule.apply(&current) {
                Cow::Owned(masked) => Some(masked),
                Cow::Borrowed(_) => None,
            };
            if let Some(masked) = masked {
                current = Cow::Owned(masked);
            }
        }

        current
    }
}

impl Default for MaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_group_masks_only_group() {
        let masks = MaskRegistry::new();
        masks.add_pattern_mask(r"password=(\S+)", "****", 1).unwrap();

        assert_eq!(masks.apply("password=secret123 ok"), "password=**** ok");
    }

    #[test]
    fn test_whole_match_is_global() {
        let masks = MaskRegistry::new();
        masks.add_pattern_mask(r"\d{4}", "#", 0).unwrap();

        assert_eq!(masks.apply("1234-5678-90"), "#-#-90");
    }

    #[test]
    fn test_group_masking_keeps_text_around_group() {
        let masks = MaskRegistry::new();
        masks.add_pattern_mask(r"(user|pass)=(\w+);", "?", 2).unwrap();

        assert_eq!(
            masks.apply("user=bob; pass=hunter2; end"),
            "user=?; pass=?; end"
        );
    }

    #[test]
    fn test_blank_replacement_defaults() {
        let masks = MaskRegistry::new();
        masks.add_pattern_mask("secret", "  ", 0).unwrap();

        assert_eq!(masks.apply("a secret b"), "a ******** b");
        assert_eq!(masks.snapshot()[0].replacement(), DEFAULT_REPLACEMENT);
    }

    #[test]
    fn test_duplicate_pattern_is_noop() {
        let masks = MaskRegistry::new();
        assert!(masks.add_pattern_mask("X", "****", 0).unwrap());
        assert_eq!(masks.rule_count(), 1);

        assert!(!masks.add_pattern_mask("X", "****", 0).unwrap());
        assert!(!masks.add_pattern_mask("X", "other", 0).unwrap());
        assert_eq!(masks.rule_count(), 1);
        assert_eq!(masks.apply("aXb"), "a****b");
    }

    #[test]
    fn test_rules_compose_in_registration_order() {
        let masks = MaskRegistry::new();
        // A turns "abc" into "XYZ"; B then sees A's output
        masks.add_pattern_mask("abc", "XYZ", 0).unwrap();
        masks.add_pattern_mask("XY", "--", 0).unwrap();
        assert_eq!(masks.apply("abc"), "--Z");

        let reversed = MaskRegistry::new();
        reversed.add_pattern_mask("XY", "--", 0).unwrap();
        reversed.add_pattern_mask("abc", "XYZ", 0).unwrap();
        assert_eq!(reversed.apply("abc"), "XYZ");
    }

    #[test]
    fn test_unmatched_text_is_borrowed() {
        let masks = MaskRegistry::new();
        masks.add_pattern_mask("token", "***", 0).unwrap();

        assert!(matches!(masks.apply("nothing here"), Cow::Borrowed(_)));
        assert!(matches!(MaskRegistry::new().apply("x"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_match_at_start_is_replaced() {
        let rule = MaskRule::new("^", ">", 0).unwrap();
        assert_eq!(rule.apply("line"), ">line");
    }

    #[test]
    fn test_optional_group_not_participating() {
        let rule = MaskRule::new(r"id(=(\d+))?", "N", 2).unwrap();
        assert_eq!(rule.apply("id id=42"), "id id=N");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let masks = MaskRegistry::new();
        let err = masks.add_pattern_mask("(open", "*", 0).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidPattern { .. }));
        assert_eq!(masks.rule_count(), 0);
    }

    #[test]
    fn test_out_of_range_group_rejected() {
        let err = MaskRule::new(r"key=(\w+)", "*", 2).unwrap_err();
        assert!(matches!(
            err,
            LoggerError::InvalidCaptureGroup {
                group: 2,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_snapshot_is_stable_across_registration() {
        let masks = MaskRegistry::new();
        masks.add_pattern_mask("a", "1", 0).unwrap();
        let before = masks.snapshot();

        masks.add_pattern_mask("b", "2", 0).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(masks.snapshot().len(), 2);
        assert_eq!(masks.snapshot()[1].source(), "b");
    }
}
