//! Interactive input parsing
//!
//! Tokenizes command lines and converts field text into model types.
//! The shell runs lenient by default: bad values coerce to defaults and
//! the coercion is reported as a notice. `--strict` turns every notice
//! into a hard error instead.

use chrono::{NaiveDate, NaiveDateTime};

use crate::task::{Priority, Recurrence, ValidationError};

/// How to treat malformed field values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Coerce to defaults and report a notice
    #[default]
    Lenient,
    /// Reject with a `ValidationError`
    Strict,
}

/// Split a command line into tokens.
///
/// Double or single quotes group words into one token and may produce
/// an explicitly empty token (`""`), which the update command treats as
/// "keep the current value". An unterminated quote runs to the end of
/// the line. No escape sequences.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Parse `YYYY-MM-DD HH:MM`, falling back to `YYYY-MM-DD` at midnight
pub fn parse_due_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Field-by-field parser that tracks coercion notices
#[derive(Debug)]
pub struct FieldParser {
    mode: ParseMode,
    notices: Vec<String>,
}

impl FieldParser {
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            notices: Vec::new(),
        }
    }

    /// Notices accumulated since the last call, oldest first
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn priority(&mut self, raw: &str) -> Result<Priority, ValidationError> {
        match Priority::parse(raw) {
            Some(priority) => Ok(priority),
            None => match self.mode {
                ParseMode::Strict => Err(ValidationError::InvalidPriority(raw.trim().to_string())),
                ParseMode::Lenient => {
                    self.notices
                        .push(format!("unknown priority '{}', using medium", raw.trim()));
                    Ok(Priority::default())
                }
            },
        }
    }

    pub fn recurrence(&mut self, raw: &str) -> Result<Recurrence, ValidationError> {
        match Recurrence::parse(raw) {
            Some(recurrence) => Ok(recurrence),
            None => match self.mode {
                ParseMode::Strict => {
                    Err(ValidationError::InvalidRecurrence(raw.trim().to_string()))
                }
                ParseMode::Lenient => {
                    self.notices
                        .push(format!("unknown recurrence '{}', using none", raw.trim()));
                    Ok(Recurrence::default())
                }
            },
        }
    }

    pub fn due_date(&mut self, raw: &str) -> Result<Option<NaiveDateTime>, ValidationError> {
        match parse_due_date(raw) {
            Some(due) => Ok(Some(due)),
            None => match self.mode {
                ParseMode::Strict => Err(ValidationError::InvalidDueDate(raw.trim().to_string())),
                ParseMode::Lenient => {
                    self.notices.push(format!(
                        "could not parse due date '{}', leaving it unset",
                        raw.trim()
                    ));
                    Ok(None)
                }
            },
        }
    }

    /// Split a comma-separated tag list, e.g. `work,home`
    pub fn tags(&mut self, raw: &str) -> Result<Vec<String>, ValidationError> {
        let mut tags = Vec::new();
        let mut dropped = 0usize;
        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                match self.mode {
                    ParseMode::Strict => return Err(ValidationError::EmptyTag),
                    ParseMode::Lenient => dropped += 1,
                }
            } else {
                tags.push(entry.to_string());
            }
        }
        if dropped > 0 {
            self.notices.push(format!(
                "dropped {} empty tag {}",
                dropped,
                if dropped == 1 { "entry" } else { "entries" }
            ));
        }
        Ok(tags)
    }
}
