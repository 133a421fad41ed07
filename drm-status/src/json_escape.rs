/// Escapes a string per the status wire format's rule: escape `"`,
/// `\`, and the named control characters; escape any other byte below
/// `0x20` as `\u00XX`; leave every byte `>= 0x20` untouched, including
/// multi-byte UTF-8 sequences. `serde_json` already implements exactly
/// this rule for its string serializer, so this wraps it rather than
/// re-deriving the escaping table by hand.
pub fn escape_json_string(input: &str) -> String {
    let quoted = serde_json::to_string(input).expect("string serialization cannot fail");
    quoted[1..quoted.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quote_and_backslash() {
        assert_eq!(escape_json_string("a\"b\\c"), "a\\\"b\\\\c");
    }

    #[test]
    fn escapes_control_characters_as_unicode_escapes() {
        assert_eq!(escape_json_string("a\u{0001}b"), "a\\u0001b");
        assert_eq!(escape_json_string("a\nb\tb"), "a\\nb\\tb");
    }

    #[test]
    fn preserves_multibyte_utf8_verbatim() {
        let label = "Radio Ñandú 日本語";
        assert_eq!(escape_json_string(label), label);
    }
}
