/// Errors produced while building commands or interpreting replies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// A command argument is outside its protocol-defined range.
    #[error("invalid {name} {value} (valid range is {min}-{max})")]
    InvalidArgument {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The drone replied, but not with the success token.
    #[error("drone rejected '{command}': {reply:?}")]
    CommandRejected { command: String, reply: String },

    /// The reply does not have the shape expected for the query.
    #[error("malformed reply to '{command}' (expected {expected}): {reply:?}")]
    MalformedResponse {
        command: String,
        expected: &'static str,
        reply: String,
    },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
