//! Parser for one line of the definition-file format.
//!
//! Grammar, fields in fixed order after the mandatory type token:
//!
//! ```text
//! [*][!][platform:]media/sub [@ext1,ext2,...] [:encoding] ['url1,url2,...] [=docs] [#comment]
//! ```
//!
//! `*` marks the record unregistered, `!` obsolete. Blank lines and
//! comment-only lines parse to nothing; anything else that fails the
//! grammar is a hard error carrying the source location, since definition
//! corpora are trusted build-time assets.

use crate::error::{Error, Result};
use crate::grammar;
use crate::mime_type::{Encoding, MimeType};

fn parse_error(file: &str, index: usize, line: &str, reason: impl Into<String>) -> Error {
    Error::DefinitionParse {
        file: file.to_string(),
        line: index,
        text: line.to_string(),
        reason: reason.into(),
    }
}

/// Splits off a whitespace-delimited field token.
fn split_field(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

/// Cuts a trailing `#comment` off a docs capture.
fn strip_trailing_comment(s: &str) -> &str {
    let mut boundary_ws = true;
    for (i, c) in s.char_indices() {
        if c == '#' && boundary_ws {
            return s[..i].trim_end();
        }
        boundary_ws = c.is_whitespace();
    }
    s.trim_end()
}

/// Parses one definition line into a type record.
///
/// Returns `Ok(None)` for blank and comment-only lines. `file` and the
/// zero-based `index` are carried into any parse error.
pub fn parse_line(file: &str, index: usize, line: &str) -> Result<Option<MimeType>> {
    let text = line.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let mut rest = text;
    let unregistered = match rest.strip_prefix('*') {
        Some(r) => {
            rest = r;
            true
        }
        None => false,
    };
    let obsolete = match rest.strip_prefix('!') {
        Some(r) => {
            rest = r;
            true
        }
        None => false,
    };

    // A word-character run closed by ':' before the type token is a
    // platform marker; a '/' arrives first in every plain identifier.
    let platform = {
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if end > 0 && rest[end..].starts_with(':') {
            let p = &rest[..end];
            rest = &rest[end + 1..];
            Some(p)
        } else {
            None
        }
    };

    if rest.trim_start().starts_with('#') {
        // Comment-only line, flags and all.
        return Ok(None);
    }

    let type_end = rest
        .find(|c: char| !(grammar::is_segment_char(c) || c == '/'))
        .unwrap_or(rest.len());
    let type_token = &rest[..type_end];
    rest = &rest[type_end..];

    if type_token.is_empty() {
        return Err(parse_error(file, index, line, "no media/sub group"));
    }
    let mut record = MimeType::new(type_token)
        .map_err(|_| parse_error(file, index, line, "invalid media/sub group"))?;

    record.set_registered(!unregistered);
    record.set_obsolete(obsolete);
    if let Some(p) = platform {
        record
            .set_system(Some(p))
            .map_err(|e| parse_error(file, index, line, e.to_string()))?;
    }

    // Optional fields, fixed order: @extensions, :encoding, 'urls, =docs.
    const EXTENSIONS: u8 = 1;
    const ENCODING: u8 = 2;
    const URLS: u8 = 3;
    const DOCS: u8 = 4;
    let mut last_field = 0u8;
    let mut enter_field = |field: u8| -> std::result::Result<(), &'static str> {
        if field <= last_field {
            return Err("field out of order");
        }
        last_field = field;
        Ok(())
    };

    loop {
        let trimmed = rest.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            break;
        }
        if trimmed.len() == rest.len() {
            return Err(parse_error(file, index, line, "unexpected trailing characters"));
        }
        rest = trimmed;

        let marker = rest.chars().next().unwrap_or_default();
        let body = &rest[marker.len_utf8()..];
        match marker {
            '@' => {
                enter_field(EXTENSIONS).map_err(|e| parse_error(file, index, line, e))?;
                let (token, tail) = split_field(body);
                record.set_extensions(token.split(','));
                rest = tail;
            }
            ':' => {
                enter_field(ENCODING).map_err(|e| parse_error(file, index, line, e))?;
                let (token, tail) = split_field(body);
                let encoding: Encoding = token
                    .parse()
                    .map_err(|e: Error| parse_error(file, index, line, e.to_string()))?;
                record.set_encoding(encoding);
                rest = tail;
            }
            '\'' => {
                enter_field(URLS).map_err(|e| parse_error(file, index, line, e))?;
                let (token, tail) = split_field(body);
                record.set_urls(token.split(','));
                rest = tail;
            }
            '=' => {
                enter_field(DOCS).map_err(|e| parse_error(file, index, line, e))?;
                let docs = strip_trailing_comment(body.trim_start());
                if !docs.is_empty() {
                    record.set_docs(Some(docs));
                }
                rest = "";
            }
            _ => {
                return Err(parse_error(file, index, line, "unexpected field marker"));
            }
        }
    }

    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Option<MimeType>> {
        parse_line("test.types", 0, line)
    }

    fn parse_ok(line: &str) -> MimeType {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert!(parse("").unwrap().is_none());
        assert!(parse("   ").unwrap().is_none());
        assert!(parse("# a comment").unwrap().is_none());
        assert!(parse("   # indented comment").unwrap().is_none());
        assert!(parse("*! # flags then only a comment").unwrap().is_none());
    }

    #[test]
    fn test_minimal_line() {
        let t = parse_ok("text/plain");
        assert_eq!(t.content_type(), "text/plain");
        assert!(t.is_registered());
        assert!(!t.is_obsolete());
        assert!(!t.is_system());
        assert!(t.extensions().is_empty());
        assert_eq!(t.encoding(), Encoding::QuotedPrintable);
    }

    #[test]
    fn test_full_line() {
        let t = parse_ok("*!vms:text/x-note @not,nte :8bit 'IANA,RFC0000 =use-instead:text/plain #legacy");
        assert!(!t.is_registered());
        assert!(t.is_obsolete());
        assert!(t.is_system());
        assert!(t.system().unwrap().is_match("vms"));
        assert_eq!(t.extensions(), ["not", "nte"]);
        assert_eq!(t.encoding(), Encoding::EightBit);
        assert_eq!(t.url_tokens(), ["IANA", "RFC0000"]);
        assert_eq!(t.docs(), Some("use-instead:text/plain"));
        assert_eq!(t.use_instead(), Some(&["text/plain".to_string()][..]));
    }

    #[test]
    fn test_flags() {
        let t = parse_ok("*application/x-eruby @rhtml");
        assert!(!t.is_registered());
        assert!(!t.is_obsolete());

        let t = parse_ok("!application/news-message-id");
        assert!(t.is_registered());
        assert!(t.is_obsolete());
    }

    #[test]
    fn test_platform_marker() {
        let t = parse_ok("vms:text/plain @doc");
        assert!(t.is_system());
        assert!(t.system().unwrap().is_match("vms"));
        assert_eq!(t.extensions(), ["doc"]);

        // No colon, no platform.
        let t = parse_ok("text/plain @txt");
        assert!(!t.is_system());
    }

    #[test]
    fn test_extension_list() {
        let t = parse_ok("text/plain @asc,txt,c");
        assert_eq!(t.extensions(), ["asc", "txt", "c"]);

        // Empty entries in the list are dropped.
        let t = parse_ok("text/plain @asc,,c");
        assert_eq!(t.extensions(), ["asc", "c"]);
    }

    #[test]
    fn test_encoding_field() {
        let t = parse_ok("application/zip @zip :base64");
        assert_eq!(t.encoding(), Encoding::Base64);

        let err = parse("application/zip :zstd").unwrap_err();
        assert!(matches!(err, Error::DefinitionParse { .. }));
        assert!(err.to_string().contains("zstd"));
    }

    #[test]
    fn test_url_list() {
        let t = parse_ok("audio/mpeg @mp3 'IANA,RFC3003");
        assert_eq!(t.url_tokens(), ["IANA", "RFC3003"]);
    }

    #[test]
    fn test_docs_with_comment() {
        let t = parse_ok("text/troff =roff sources #see groff");
        assert_eq!(t.docs(), Some("roff sources"));

        let t = parse_ok("text/troff =roff sources");
        assert_eq!(t.docs(), Some("roff sources"));
    }

    #[test]
    fn test_trailing_comment_after_fields() {
        let t = parse_ok("image/png @png :base64 # raster");
        assert_eq!(t.extensions(), ["png"]);
        assert_eq!(t.encoding(), Encoding::Base64);
    }

    #[test]
    fn test_malformed_lines() {
        for bad in [
            "*",
            "!",
            "not-a-type",
            "/zip",
            "text/plain :8bit @txt", // fields out of order
            "text/plain ?what",
        ] {
            let err = parse(bad).unwrap_err();
            match err {
                Error::DefinitionParse { file, line, text, .. } => {
                    assert_eq!(file, "test.types");
                    assert_eq!(line, 0);
                    assert_eq!(text, bad);
                }
                other => panic!("expected DefinitionParse for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_error_carries_location() {
        let err = parse_line("mime.types", 41, "garbage!").unwrap_err();
        assert!(err.to_string().starts_with("mime.types:41:"));
    }
}
