use crate::command::Command;
use crate::error::{ProtocolError, Result};

/// Success token.
pub const OK: &str = "ok";

/// Prefix of every failure reply (`error`, `error Motor stop`, ...).
pub const ERROR_PREFIX: &str = "error";

const MILLIMETER_SUFFIX: &str = "mm";

/// The decoded text of one reply.
///
/// Status replies compare against the raw text exactly. Value replies are
/// trimmed first, since some firmware appends `\r\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    raw: String,
}

impl Response {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The reply exactly as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The reply with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.raw.trim()
    }

    /// True only when the reply is exactly `ok`.
    pub fn is_ok(&self) -> bool {
        self.raw == OK
    }

    pub fn is_error(&self) -> bool {
        self.trimmed().starts_with(ERROR_PREFIX)
    }

    /// Require the success token.
    pub fn expect_ok(&self, command: &Command) -> Result<()> {
        if self.is_ok() {
            return Ok(());
        }
        Err(self.rejected(command))
    }

    /// Parse a `<digits>mm` distance reading.
    pub fn millimeters(&self, command: &Command) -> Result<u32> {
        self.check_not_error(command)?;
        self.trimmed()
            .strip_suffix(MILLIMETER_SUFFIX)
            .and_then(parse_digits)
            .ok_or_else(|| self.malformed(command, "<digits>mm"))
    }

    /// Parse a bare battery percentage (0-100).
    pub fn percentage(&self, command: &Command) -> Result<u8> {
        self.check_not_error(command)?;
        parse_digits(self.trimmed())
            .filter(|value| *value <= 100)
            .and_then(|value| u8::try_from(value).ok())
            .ok_or_else(|| self.malformed(command, "an integer percentage"))
    }

    /// Parse an all-digits integer.
    pub fn integer(&self, command: &Command) -> Result<u32> {
        self.check_not_error(command)?;
        parse_digits(self.trimmed()).ok_or_else(|| self.malformed(command, "<digits>"))
    }

    fn check_not_error(&self, command: &Command) -> Result<()> {
        if self.is_error() {
            return Err(self.rejected(command));
        }
        Ok(())
    }

    fn rejected(&self, command: &Command) -> ProtocolError {
        ProtocolError::CommandRejected {
            command: command.to_string(),
            reply: self.raw.clone(),
        }
    }

    fn malformed(&self, command: &Command, expected: &'static str) -> ProtocolError {
        ProtocolError::MalformedResponse {
            command: command.to_string(),
            expected,
            reply: self.raw.clone(),
        }
    }
}

fn parse_digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
