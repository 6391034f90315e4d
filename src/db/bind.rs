//! Client-side binding of positional `?` parameters
//!
//! ClickHouse's HTTP interface has no positional parameters, so values are
//! rendered as escaped string literals before the statement is sent.

use crate::error::{Error, Result};

/// Render `value` as a single-quoted ClickHouse string literal
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    push_literal(&mut out, value);
    out
}

fn push_literal(out: &mut String, value: &str) {
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}

/// Substitute each `?` outside of quotes with the next parameter.
///
/// Question marks inside string literals, quoted names or backtick
/// identifiers are left alone. The number of placeholders must match the
/// number of parameters exactly.
pub fn bind_params(statement: &str, params: &[String]) -> Result<String> {
    if params.is_empty() && !statement.contains('?') {
        return Ok(statement.to_string());
    }

    let extra: usize = params.iter().map(|p| p.len() + 2).sum();
    let mut out = String::with_capacity(statement.len() + extra);
    let mut placeholders = 0;
    let mut quote: Option<char> = None;
    let mut chars = statement.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    out.push(c);
                }
                '?' => {
                    if let Some(value) = params.get(placeholders) {
                        push_literal(&mut out, value);
                    }
                    placeholders += 1;
                }
                _ => out.push(c),
            },
        }
    }

    if quote.is_some() {
        return Err(Error::storage("unterminated quote in statement"));
    }
    if placeholders != params.len() {
        return Err(Error::storage(format!(
            "statement has {} placeholders but {} parameters were given",
            placeholders,
            params.len()
        )));
    }
    Ok(out)
}
