//! Literal decoding for raw triple objects.
//!
//! The object token is whatever trails the subject and predicate on the line:
//! `"some text"@en .`, `"4.5"^^<http://www.w3.org/2001/XMLSchema#double> .`,
//! `<http://example.org/x> .` and so on. Decoding is best effort: malformed
//! input yields a possibly-incorrect plain string rather than an error.

/// Normalize a raw object token into a plain string value.
///
/// Strips, in order: a trailing `^^<datatype>` annotation, the trailing
/// statement terminator (` .`), a trailing `@lang` tag, and exactly one pair
/// of surrounding double quotes. Idempotent: decoding an already-decoded
/// value returns it unchanged.
pub fn decode_literal(raw: &str) -> String {
    let mut value = match raw.split_once("^^") {
        Some((lexical, _datatype)) => lexical,
        None => raw,
    };

    if let Some(stripped) = value.strip_suffix(" .") {
        value = stripped;
    }

    // Language tags only follow a closing quote; a bare `@` inside an
    // unquoted value (e.g. an email-shaped literal) is left alone.
    if let Some(at) = value.rfind('@') {
        if value[..at].ends_with('"') && !value[at + 1..].contains(' ') {
            value = &value[..at];
        }
    }

    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    value.to_string()
}

/// Strip one leading `<` and one trailing `>` from a URI token.
pub fn strip_angles(token: &str) -> &str {
    let token = token.strip_prefix('<').unwrap_or(token);
    token.strip_suffix('>').unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quotes_and_terminator() {
        assert_eq!(decode_literal("\"TP53\" ."), "TP53");
    }

    #[test]
    fn strips_datatype_annotation() {
        assert_eq!(
            decode_literal("\"4.5\"^^<http://www.w3.org/2001/XMLSchema#double> ."),
            "4.5"
        );
    }

    #[test]
    fn strips_language_tag() {
        assert_eq!(decode_literal("\"tumor protein\"@en ."), "tumor protein");
    }

    #[test]
    fn keeps_spaces_inside_value() {
        assert_eq!(
            decode_literal("\"cellular tumor antigen p53\" ."),
            "cellular tumor antigen p53"
        );
    }

    #[test]
    fn uri_object_passes_through() {
        assert_eq!(
            decode_literal("<http://example.org/P04637> ."),
            "<http://example.org/P04637>"
        );
    }

    #[test]
    fn decoding_is_idempotent() {
        let once = decode_literal("\"Foo bar\"@en .");
        assert_eq!(decode_literal(&once), once);

        let once = decode_literal("\"42\"^^<http://www.w3.org/2001/XMLSchema#int> .");
        assert_eq!(decode_literal(&once), once);
    }

    #[test]
    fn at_sign_inside_value_survives() {
        assert_eq!(decode_literal("\"a@b.org\" ."), "a@b.org");
    }

    #[test]
    fn strip_angles_removes_one_pair() {
        assert_eq!(strip_angles("<http://x/y>"), "http://x/y");
        assert_eq!(strip_angles("http://x/y"), "http://x/y");
    }
}
