//! INI-style text parsing.
//!
//! # Format
//! ```text
//! ; comment
//! [Default]
//! EngineFireColor = Red
//!
//! [Aircraft.C172]
//! EngineFireColor = Orange
//! ```
//!
//! # Design Decisions
//! - Each line is classified on its own; first matching rule wins
//! - Values are opaque strings, typed by the consumer
//! - Lines that are neither header, comment nor `key = value` are ignored
//! - Failure is total: no partial snapshot is ever returned
//! - No regex, plain string scanning

use crate::config::error::ParseError;
use crate::config::snapshot::{ConfigSnapshot, Section};

/// How a single trimmed line was classified.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Comment,
    Header(&'a str),
    Pair(&'a str, &'a str),
    Other,
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();

    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with(';') {
        return Line::Comment;
    }
    if let Some(name) = section_name(line) {
        return Line::Header(name);
    }
    if let Some((key, value)) = line.split_once('=') {
        return Line::Pair(key.trim_end(), value.trim_start());
    }
    Line::Other
}

/// The verbatim text between a single pair of enclosing brackets.
fn section_name(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    if inner.contains(['[', ']']) {
        return None;
    }
    Some(inner)
}

/// Parse lines, in file order, into a snapshot.
pub fn parse_lines<I, S>(lines: I) -> Result<ConfigSnapshot, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut snapshot = ConfigSnapshot::empty();
    let mut current: Option<String> = None;

    for (index, raw) in lines.into_iter().enumerate() {
        let line_no = index + 1;

        match classify(raw.as_ref()) {
            Line::Blank | Line::Comment | Line::Other => {}
            Line::Header(name) => {
                if !snapshot.insert_section(Section::new(name)) {
                    return Err(ParseError::DuplicateSection {
                        line: line_no,
                        name: name.to_string(),
                    });
                }
                current = Some(name.to_string());
            }
            Line::Pair(key, value) => {
                let section = current
                    .as_deref()
                    .and_then(|name| snapshot.section_mut(name))
                    .ok_or(ParseError::KeyOutsideSection { line: line_no })?;
                section.insert(key, value);
            }
        }
    }

    Ok(snapshot)
}

/// Parse a whole file's contents. Accepts `\n` and `\r\n` line endings.
pub fn parse_str(text: &str) -> Result<ConfigSnapshot, ParseError> {
    parse_lines(text.lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
; annunciator colours
[Default]
EngineFireColor = Red

[Aircraft.C172]
EngineFireColor = Orange
";

    #[test]
    fn test_parse_sample() {
        let snapshot = parse_str(SAMPLE).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.section("Default").unwrap().get("EngineFireColor"), Some("Red"));
        assert_eq!(snapshot.section("Aircraft.C172").unwrap().get("EngineFireColor"), Some("Orange"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify("  ; note = 1"), Line::Comment);
        assert_eq!(classify(" [ Spaced Name ] "), Line::Header(" Spaced Name "));
        assert_eq!(classify("[]"), Line::Header(""));
        assert_eq!(classify("key=value"), Line::Pair("key", "value"));
        assert_eq!(classify("key   =   a = b  "), Line::Pair("key", "a = b"));
        assert_eq!(classify("key ="), Line::Pair("key", ""));
        assert_eq!(classify("just some words"), Line::Other);
        assert_eq!(classify("[a]b]"), Line::Other);
        assert_eq!(classify("[[a]]"), Line::Other);
    }

    #[test]
    fn test_section_name_kept_verbatim() {
        let snapshot = parse_str("[ Default ]\nk = v").unwrap();
        assert!(snapshot.section("Default").is_none());
        assert_eq!(snapshot.section(" Default ").unwrap().get("k"), Some("v"));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let snapshot = parse_str("[Default]\nColor = Red\nColor = Blue\n").unwrap();
        assert_eq!(snapshot.section("Default").unwrap().get("Color"), Some("Blue"));
    }

    #[test]
    fn test_key_before_section_is_malformed() {
        let err = parse_str("; header comment\nColor = Red\n[Default]\n").unwrap_err();
        assert_eq!(err, ParseError::KeyOutsideSection { line: 2 });
    }

    #[test]
    fn test_duplicate_section_is_malformed() {
        let err = parse_str("[Default]\na = 1\n[Other]\n[Default]\nb = 2\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateSection {
                line: 4,
                name: "Default".into()
            }
        );
    }

    #[test]
    fn test_unrecognised_lines_ignored() {
        let snapshot = parse_str("garbage before\n[Default]\nnot a pair\nk = v\n").unwrap();
        let section = snapshot.section("Default").unwrap();
        assert_eq!(section.len(), 1);
        assert_eq!(section.get("k"), Some("v"));
    }

    #[test]
    fn test_crlf_and_empty_sections() {
        let snapshot = parse_str("[Empty]\r\n[Default]\r\nk = v\r\n").unwrap();
        assert!(snapshot.section("Empty").unwrap().is_empty());
        assert_eq!(snapshot.section("Default").unwrap().get("k"), Some("v"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(parse_str(SAMPLE).unwrap(), parse_str(SAMPLE).unwrap());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_lines(Vec::<String>::new()).unwrap().is_empty());
    }
}
