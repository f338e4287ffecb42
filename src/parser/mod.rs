//! Tail-line parsing for benchmark run output.
//!
//! Only the last two lines of a run's combined output carry data: the
//! second-to-last is expected to read `allocate <value> ...` and the last
//! `deallocate <value> ...`. Everything above them (build noise, progress
//! messages) is ignored. The value token is filtered down to its digits-and-
//! dots subsequence before conversion, so a unit suffix like `102.4ns`
//! scrapes to `102.4`.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Number of trailing lines a run must produce to be parseable.
pub const TAIL_LINES: usize = 2;

/// The two measurements a run reports, identified by the label token that
/// opens their line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    Allocate,
    Deallocate,
}

impl SampleKind {
    /// The literal token expected at the start of this kind's line.
    pub fn label(self) -> &'static str {
        match self {
            SampleKind::Allocate => "allocate",
            SampleKind::Deallocate => "deallocate",
        }
    }
}

impl std::fmt::Display for SampleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of parsing one run's trailing two lines.
///
/// The two sides are independent: a mismatch on the allocate line does not
/// invalidate a well-formed deallocate line, and vice versa.
#[derive(Debug, Clone)]
pub struct ParsedTail {
    pub allocate: Result<f64, ParseError>,
    pub deallocate: Result<f64, ParseError>,
}

impl ParsedTail {
    /// Whether both lines parsed cleanly.
    pub fn is_complete(&self) -> bool {
        self.allocate.is_ok() && self.deallocate.is_ok()
    }
}

/// Parses the trailing two lines of a run's combined output.
///
/// Fails with [`ParseError::InsufficientOutput`] when fewer than two lines
/// are present; per-line failures are carried inside the returned
/// [`ParsedTail`] so one bad line never hides a good one.
pub fn parse_output(raw: &str) -> Result<ParsedTail, ParseError> {
    let lines: Vec<&str> = raw.lines().collect();
    if lines.len() < TAIL_LINES {
        return Err(ParseError::InsufficientOutput {
            required: TAIL_LINES,
            actual: lines.len(),
        });
    }
    Ok(ParsedTail {
        allocate: parse_label_line(lines[lines.len() - 2], SampleKind::Allocate),
        deallocate: parse_label_line(lines[lines.len() - 1], SampleKind::Deallocate),
    })
}

/// Parses a single `<label> <value> ...` line.
///
/// The first whitespace token must equal the kind's label exactly; the second
/// token is reduced with [`numeric_fragment`] and converted to `f64`. Tokens
/// past the second (`(65536 times)` and the like) are ignored.
pub fn parse_label_line(line: &str, kind: SampleKind) -> Result<f64, ParseError> {
    let expected = kind.label();
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let Some(first) = tokens.first() else {
        return Err(ParseError::BlankLine { expected });
    };
    if *first != expected {
        return Err(ParseError::LabelMismatch {
            expected,
            found: (*first).to_string(),
            tokens: tokens.iter().map(|t| (*t).to_string()).collect(),
        });
    }
    let Some(token) = tokens.get(1) else {
        return Err(ParseError::MissingValue { label: expected });
    };

    let filtered = numeric_fragment(token);
    filtered
        .parse::<f64>()
        .map_err(|_| ParseError::MalformedNumber {
            token: (*token).to_string(),
            filtered,
        })
}

/// Keeps only ASCII digits and `.` characters of a token, in order.
///
/// This is the whole unit-stripping story: `102.4ns` becomes `102.4`,
/// `1,234.5ms` becomes `1234.5`. A token with stray extra dots (`1.2.3`)
/// survives the filter but fails the numeric conversion afterwards.
pub fn numeric_fragment(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fragment_strips_unit_suffix() {
        assert_eq!(numeric_fragment("102.4ns"), "102.4");
        assert_eq!(numeric_fragment("12a.5b"), "12.5");
        assert_eq!(numeric_fragment("1,234.5ms"), "1234.5");
    }

    #[test]
    fn test_numeric_fragment_empty_when_no_digits() {
        assert_eq!(numeric_fragment("oops"), "");
        assert_eq!(numeric_fragment(""), "");
    }

    #[test]
    fn test_parse_label_line_happy_path() {
        let value = parse_label_line("allocate   102.4ns (65536 times)", SampleKind::Allocate);
        assert_eq!(value, Ok(102.4));
    }

    #[test]
    fn test_parse_label_line_tab_separated() {
        let value = parse_label_line("deallocate\t55.1ns", SampleKind::Deallocate);
        assert_eq!(value, Ok(55.1));
    }

    #[test]
    fn test_parse_label_line_mismatch_reports_tokens() {
        let err = parse_label_line("error occurred", SampleKind::Allocate).unwrap_err();
        match err {
            ParseError::LabelMismatch {
                expected,
                found,
                tokens,
            } => {
                assert_eq!(expected, "allocate");
                assert_eq!(found, "error");
                assert_eq!(tokens, vec!["error".to_string(), "occurred".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_label_line_blank() {
        let err = parse_label_line("", SampleKind::Deallocate).unwrap_err();
        assert_eq!(
            err,
            ParseError::BlankLine {
                expected: "deallocate"
            }
        );
    }

    #[test]
    fn test_parse_label_line_missing_value() {
        let err = parse_label_line("allocate", SampleKind::Allocate).unwrap_err();
        assert_eq!(err, ParseError::MissingValue { label: "allocate" });
    }

    #[test]
    fn test_parse_label_line_unparseable_token() {
        let err = parse_label_line("allocate fast", SampleKind::Allocate).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedNumber {
                token: "fast".to_string(),
                filtered: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_label_line_double_dot_rejected() {
        let err = parse_label_line("allocate 1.2.3ns", SampleKind::Allocate).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedNumber {
                token: "1.2.3ns".to_string(),
                filtered: "1.2.3".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_output_takes_last_two_lines() {
        let raw = "Compiling bench v0.1.0\nFinished release target\nallocate 102.4ns (65536 times)\ndeallocate 55.1ns (65536 times)\n";
        let tail = parse_output(raw).unwrap();
        assert_eq!(tail.allocate, Ok(102.4));
        assert_eq!(tail.deallocate, Ok(55.1));
        assert!(tail.is_complete());
    }

    #[test]
    fn test_parse_output_without_trailing_newline() {
        let tail = parse_output("allocate 1.5\ndeallocate 2.5").unwrap();
        assert_eq!(tail.allocate, Ok(1.5));
        assert_eq!(tail.deallocate, Ok(2.5));
    }

    #[test]
    fn test_parse_output_crlf_lines() {
        let tail = parse_output("allocate 1.5\r\ndeallocate 2.5\r\n").unwrap();
        assert_eq!(tail.allocate, Ok(1.5));
        assert_eq!(tail.deallocate, Ok(2.5));
    }

    #[test]
    fn test_parse_output_single_line_is_insufficient() {
        let err = parse_output("just one line\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InsufficientOutput {
                required: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_parse_output_empty_is_insufficient() {
        let err = parse_output("").unwrap_err();
        assert_eq!(
            err,
            ParseError::InsufficientOutput {
                required: 2,
                actual: 0,
            }
        );
    }

    #[test]
    fn test_parse_output_sides_fail_independently() {
        let tail = parse_output("whatever\ndeallocate 4.0ns\n").unwrap();
        assert!(matches!(
            tail.allocate,
            Err(ParseError::LabelMismatch { .. })
        ));
        assert_eq!(tail.deallocate, Ok(4.0));
        assert!(!tail.is_complete());
    }

    #[test]
    fn test_sample_kind_labels() {
        assert_eq!(SampleKind::Allocate.label(), "allocate");
        assert_eq!(SampleKind::Deallocate.label(), "deallocate");
        assert_eq!(SampleKind::Allocate.to_string(), "allocate");
    }
}
