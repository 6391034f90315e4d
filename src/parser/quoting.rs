//! Strict quote checking for CSV input
//!
//! The `csv` reader accepts stray and unterminated quotes as data. Input is
//! checked here first so that such records fail instead of loading garbage.

use std::fmt;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A quoting mistake and the 1-indexed line it was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteFault {
    /// `"` inside a field that did not start with a quote
    BareQuote { line: usize },
    /// A closing quote followed by something other than `,` or a line end
    ExtraneousQuote { line: usize },
    /// End of input inside a quoted field
    Unterminated { line: usize },
}

impl fmt::Display for QuoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteFault::BareQuote { line } => {
                write!(f, "bare \" in non-quoted field on line {}", line)
            }
            QuoteFault::ExtraneousQuote { line } => {
                write!(f, "extraneous or missing \" in quoted field on line {}", line)
            }
            QuoteFault::Unterminated { line } => {
                write!(f, "quoted field starting on line {} is never closed", line)
            }
        }
    }
}

#[derive(Clone, Copy)]
enum State {
    FieldStart,
    Unquoted,
    Quoted { opened_on: usize },
    /// Saw `"` inside a quoted field: either an escape or the closing quote
    QuoteInQuoted { opened_on: usize },
    /// Saw `\r` right after a closing quote
    CrAfterQuote,
}

/// Check comma-delimited, double-quote-escaped input.
///
/// With `first_record_only` the scan stops at the end of the first record.
pub fn check_quoting(input: &[u8], first_record_only: bool) -> Result<(), QuoteFault> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    let mut state = State::FieldStart;
    let mut line = 1;

    for &byte in input {
        state = match (state, byte) {
            (State::Quoted { opened_on }, b'"') => State::QuoteInQuoted { opened_on },
            (State::Quoted { .. }, _) => state,
            (State::QuoteInQuoted { opened_on }, b'"') => State::Quoted { opened_on },
            (State::QuoteInQuoted { .. }, b',') => State::FieldStart,
            (State::QuoteInQuoted { .. }, b'\r') => State::CrAfterQuote,
            (State::QuoteInQuoted { .. }, b'\n') | (State::CrAfterQuote, b'\n') => State::FieldStart,
            (State::QuoteInQuoted { .. }, _) | (State::CrAfterQuote, _) => {
                return Err(QuoteFault::ExtraneousQuote { line });
            }
            (State::FieldStart, b'"') => State::Quoted { opened_on: line },
            (State::FieldStart, b',') => State::FieldStart,
            (State::Unquoted, b',') => State::FieldStart,
            (State::Unquoted, b'"') => return Err(QuoteFault::BareQuote { line }),
            (State::FieldStart | State::Unquoted, b'\n') => State::FieldStart,
            (State::FieldStart | State::Unquoted, _) => State::Unquoted,
        };

        if byte == b'\n' {
            if first_record_only && matches!(state, State::FieldStart) {
                return Ok(());
            }
            line += 1;
        }
    }

    match state {
        State::Quoted { opened_on } => Err(QuoteFault::Unterminated { line: opened_on }),
        _ => Ok(()),
    }
}
