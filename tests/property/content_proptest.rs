//! Message content validation properties

use proptest::prelude::*;
use utasks_chat::shared::message::{validate_content, MAX_CONTENT_CHARS};

proptest! {
    #[test]
    fn prop_whitespace_only_is_rejected(raw in "[ \t\r\n]{0,50}") {
        prop_assert!(validate_content(&raw).is_err());
    }

    #[test]
    fn prop_valid_content_is_trimmed(
        pad_left in "[ \t\n]{0,5}",
        body in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,200}[a-zA-Z0-9]",
        pad_right in "[ \t\n]{0,5}",
    ) {
        let raw = format!("{}{}{}", pad_left, body, pad_right);
        prop_assert_eq!(validate_content(&raw).unwrap(), body);
    }

    #[test]
    fn prop_length_cap_counts_characters(extra in 0usize..20) {
        let at_cap = "é".repeat(MAX_CONTENT_CHARS);
        prop_assert!(validate_content(&at_cap).is_ok());
        let over = "é".repeat(MAX_CONTENT_CHARS + 1 + extra);
        prop_assert!(validate_content(&over).is_err());
    }
}
