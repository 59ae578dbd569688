use thiserror::Error;

/// Filter engine error types.
///
/// Parse errors never escape [`Matcher::add_rule`](crate::Matcher::add_rule):
/// a rule that cannot be represented is dropped and logged. Only the file
/// loading convenience surfaces `Io` to the caller.
#[derive(Error, Debug)]
pub enum FilterError {
    /// `key=value` modifiers (`$domain=`, `$redirect=`, ...) cannot be
    /// represented; the whole rule is dropped rather than matched overbroadly.
    #[error("key=value modifiers are not supported: {0:?}")]
    UnsupportedModifier(String),

    /// Unrecognized content-type modifier name; drops the whole rule.
    #[error("unknown modifier {0:?}")]
    UnknownModifier(String),

    /// The rule body tokenized to nothing.
    #[error("rule has no tokens")]
    EmptyRule,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
