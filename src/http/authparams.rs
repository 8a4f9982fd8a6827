//! Auth-param list codec.
//!
//! Parses and renders the comma-separated `name=token` / `name="quoted"`
//! lists that follow the `Digest` scheme token in `WWW-Authenticate` and
//! `Authorization` values.
//!
//! ## Known limitation
//! Top-level splitting toggles quote state on every `"` without looking at
//! backslashes. A quoted value containing an escaped quote followed by a
//! comma is therefore split in two and the whole list is rejected.

use std::collections::HashMap;

/// Parsed parameters keyed by lower-cased parameter name.
pub type AuthParams = HashMap<String, String>;

/// Parameters rendered as bare tokens. Everything else is quoted.
const UNQUOTED_PARAMS: [&str; 4] = ["algorithm", "qop", "nc", "stale"];

/// Parse a parameter list.
///
/// `defaults` are inserted first and overridden by anything present in
/// `input`. Returns `None` if any segment is malformed; partial results
/// are never returned.
pub fn parse_params(input: &str, defaults: &[(&str, &str)]) -> Option<AuthParams> {
    let mut params: AuthParams = defaults
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect();

    for part in split_params(input) {
        let Some((name, value)) = parse_param(part) else {
            tracing::trace!(len = part.len(), "rejecting malformed auth-param");
            return None;
        };
        params.insert(name, value);
    }

    Some(params)
}

/// Render parameters in the given order.
pub fn format_params<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (name, value) in params {
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push('=');
        if UNQUOTED_PARAMS.contains(&name) {
            out.push_str(value);
        } else {
            out.push_str(&quote(value));
        }
    }
    out
}

/// Wrap a value in double quotes, escaping `\` and `"`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Split on commas outside of quotes. Empty elements are dropped.
fn split_params(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                let part = input[start..i].trim();
                if !part.is_empty() {
                    parts.push(part);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    let part = input[start..].trim();
    if !part.is_empty() {
        parts.push(part);
    }

    parts
}

/// Parse one `name=value` segment.
fn parse_param(param: &str) -> Option<(String, String)> {
    let (name, value) = param.split_once('=')?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(is_tchar) {
        return None;
    }

    let value = value.trim();
    let value = match value.strip_prefix('"') {
        Some(quoted) => unquote(quoted)?,
        None => {
            if value.is_empty() || !value.chars().all(is_tchar) {
                return None;
            }
            value.to_string()
        }
    };

    Some((name.to_ascii_lowercase(), value))
}

/// Decode the remainder of a quoted-string (opening quote already
/// consumed). The closing quote must end the input.
fn unquote(rest: &str) -> Option<String> {
    let mut out = String::with_capacity(rest.len());
    let mut chars = rest.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => {
                return if chars.as_str().is_empty() {
                    Some(out)
                } else {
                    None
                };
            }
            _ => out.push(c),
        }
    }

    // Unterminated
    None
}

/// RFC 7230 `tchar`.
fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens_and_quoted_strings() {
        let params = parse_params(
            r#"realm="testrealm@host.com", nc=00000001, qop=auth, algorithm=SHA-256"#,
            &[],
        )
        .unwrap();

        assert_eq!(params["realm"], "testrealm@host.com");
        assert_eq!(params["nc"], "00000001");
        assert_eq!(params["qop"], "auth");
        assert_eq!(params["algorithm"], "SHA-256");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_parse_escaped_characters() {
        let params = parse_params(r#"username="Mr \"Q\" \\ Co""#, &[]).unwrap();
        assert_eq!(params["username"], r#"Mr "Q" \ Co"#);
    }

    #[test]
    fn test_comma_inside_quotes_is_kept() {
        let params = parse_params(r#"realm="a, b", nonce="n""#, &[]).unwrap();
        assert_eq!(params["realm"], "a, b");
        assert_eq!(params["nonce"], "n");
    }

    #[test]
    fn test_escaped_quote_followed_by_comma_is_rejected() {
        assert!(parse_params(r#"realm="a\",b", nonce="n""#, &[]).is_none());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let params = parse_params("  realm = \"r\" ,\tstale =  true  ", &[]).unwrap();
        assert_eq!(params["realm"], "r");
        assert_eq!(params["stale"], "true");
    }

    #[test]
    fn test_missing_equals_fails_whole_parse() {
        assert!(parse_params(r#"realm="r", bogus, nonce="n""#, &[]).is_none());
    }

    #[test]
    fn test_unterminated_quote_fails() {
        assert!(parse_params(r#"realm="r"#, &[]).is_none());
    }

    #[test]
    fn test_text_after_closing_quote_fails() {
        assert!(parse_params(r#"realm="r"x"#, &[]).is_none());
    }

    #[test]
    fn test_invalid_names_and_bare_values_fail() {
        assert!(parse_params(r#"="r""#, &[]).is_none());
        assert!(parse_params(r#"re alm="r""#, &[]).is_none());
        assert!(parse_params("nc=", &[]).is_none());
        assert!(parse_params("uri=/a b", &[]).is_none());
    }

    #[test]
    fn test_defaults_have_lower_precedence() {
        let params = parse_params(
            "algorithm=SHA-512",
            &[("algorithm", "MD5"), ("stale", "false")],
        )
        .unwrap();
        assert_eq!(params["algorithm"], "SHA-512");
        assert_eq!(params["stale"], "false");
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let params = parse_params(r#"Realm="R", NONCE="abc""#, &[]).unwrap();
        assert_eq!(params["realm"], "R");
        assert_eq!(params["nonce"], "abc");
    }

    #[test]
    fn test_empty_elements_are_skipped() {
        let params = parse_params(r#", realm="r",, nonce="n","#, &[]).unwrap();
        assert_eq!(params.len(), 2);
        assert!(parse_params("", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_format_quoting_policy() {
        let out = format_params([
            ("realm", "r"),
            ("qop", "auth"),
            ("nonce", "n"),
            ("algorithm", "MD5"),
            ("stale", "false"),
            ("nc", "00000001"),
            ("cnonce", "c"),
        ]);
        assert_eq!(
            out,
            r#"realm="r", qop=auth, nonce="n", algorithm=MD5, stale=false, nc=00000001, cnonce="c""#
        );
    }

    #[test]
    fn test_format_escapes_quoted_values() {
        assert_eq!(
            format_params([("username", r#"a"b\c"#)]),
            r#"username="a\"b\\c""#
        );
    }

    #[test]
    fn test_formatted_output_parses_back() {
        let out = format_params([("opaque", "x y"), ("uri", "/dir/index.html?q=1")]);
        let params = parse_params(&out, &[]).unwrap();
        assert_eq!(params["opaque"], "x y");
        assert_eq!(params["uri"], "/dir/index.html?q=1");
    }
}
