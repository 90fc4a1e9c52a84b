//! Ledger record tokenization.
//!
//! One record per line: an operation name, an ISO-8601 date, then the
//! operation's positional fields, all whitespace-delimited. Anything after
//! the required fields is free-form metadata and is ignored.

use crate::money::{Cents, MoneyError};
use crate::time::{DateError, Timestamp};
use thiserror::Error;

/// A parsed ledger operation, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpRecord {
    /// A person moves in: opens presence and obligation.
    Start { at: Timestamp, nick: String },

    /// A person moves out for good; an unknown nickname records a
    /// retro-active stay ending here.
    Stop { at: Timestamp, nick: String },

    /// Temporary absence: presence ends, obligation continues.
    Pause { at: Timestamp, nick: String },

    /// Return from a temporary absence.
    Resume { at: Timestamp, nick: String },

    /// Direct repayment between two persons.
    Transfer {
        at: Timestamp,
        from: String,
        to: String,
        amount: Cents,
    },

    /// A shared purchase, split among everyone obligated at `at`.
    Buy {
        at: Timestamp,
        nick: String,
        amount: Cents,
    },

    /// A bill distributed over a billing window by presence.
    Pay {
        at: Timestamp,
        nick: String,
        amount: Cents,
        win_min: Timestamp,
        win_max: Timestamp,
    },
}

/// Errors raised while tokenizing a single record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The first token names no known operation.
    #[error("unrecognized operation {0:?}")]
    UnknownOp(String),

    /// A required positional field is absent.
    #[error("{op}: missing {field}")]
    MissingField {
        op: &'static str,
        field: &'static str,
    },

    /// A date token failed to parse.
    #[error(transparent)]
    Date(#[from] DateError),

    /// An amount token failed to parse.
    #[error(transparent)]
    Amount(#[from] MoneyError),

    /// A billing window that ends before it starts.
    #[error("billing window ends before it starts")]
    WindowOrder,
}

/// Parses one ledger line.
///
/// Comment lines (starting with `#`) and blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<OpRecord>, RecordError> {
    if line.starts_with('#') || line.trim().is_empty() {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    // Safety: a non-blank line has a first token
    let op = tokens.next().expect("non-blank line has a first token");

    let record = match op {
        "START" => {
            let at = date(&mut tokens, "START", "date")?;
            let nick = field(&mut tokens, "START", "nickname")?.to_string();
            OpRecord::Start { at, nick }
        }
        "STOP" => {
            let at = date(&mut tokens, "STOP", "date")?;
            let nick = field(&mut tokens, "STOP", "nickname")?.to_string();
            OpRecord::Stop { at, nick }
        }
        "PAUSE" => {
            let at = date(&mut tokens, "PAUSE", "date")?;
            let nick = field(&mut tokens, "PAUSE", "nickname")?.to_string();
            OpRecord::Pause { at, nick }
        }
        "RESUME" => {
            let at = date(&mut tokens, "RESUME", "date")?;
            let nick = field(&mut tokens, "RESUME", "nickname")?.to_string();
            OpRecord::Resume { at, nick }
        }
        "TRANSFER" => {
            let at = date(&mut tokens, "TRANSFER", "date")?;
            let from = field(&mut tokens, "TRANSFER", "payer nickname")?.to_string();
            let to = field(&mut tokens, "TRANSFER", "payee nickname")?.to_string();
            let amount = amount(&mut tokens, "TRANSFER")?;
            OpRecord::Transfer {
                at,
                from,
                to,
                amount,
            }
        }
        "BUY" => {
            let at = date(&mut tokens, "BUY", "date")?;
            let nick = field(&mut tokens, "BUY", "nickname")?.to_string();
            let amount = amount(&mut tokens, "BUY")?;
            OpRecord::Buy { at, nick, amount }
        }
        "PAY" => {
            let at = date(&mut tokens, "PAY", "date")?;
            let nick = field(&mut tokens, "PAY", "nickname")?.to_string();
            let amount = amount(&mut tokens, "PAY")?;
            let win_min = date(&mut tokens, "PAY", "window start")?;
            let win_max = date(&mut tokens, "PAY", "window end")?;
            if win_max < win_min {
                return Err(RecordError::WindowOrder);
            }
            OpRecord::Pay {
                at,
                nick,
                amount,
                win_min,
                win_max,
            }
        }
        other => return Err(RecordError::UnknownOp(other.to_string())),
    };

    Ok(Some(record))
}

fn field<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    op: &'static str,
    field: &'static str,
) -> Result<&'a str, RecordError> {
    tokens
        .next()
        .ok_or(RecordError::MissingField { op, field })
}

fn date<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    op: &'static str,
    name: &'static str,
) -> Result<Timestamp, RecordError> {
    Ok(field(tokens, op, name)?.parse()?)
}

fn amount<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    op: &'static str,
) -> Result<Cents, RecordError> {
    Ok(field(tokens, op, "amount")?.parse()?)
}
