use crate::errors::UsageError;
use crate::params::Params;
use std::fmt::{self, Display};

/// What to invoke on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A structured command path, e.g. `["mount", "goto_ra_dec_apparent"]`.
    Path(Vec<String>),
    /// A pre-formed command string sent verbatim.
    Raw(String),
}

impl Command {
    /// Build a structured command from its path segments.
    pub fn path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Path(segments.into_iter().map(Into::into).collect())
    }

    /// Build a raw command.
    pub fn raw(command: impl Into<String>) -> Self {
        Self::Raw(command.into())
    }

    /// Whether this is the `status` command, whose TCP reply spans many lines.
    pub fn is_status(&self) -> bool {
        match self {
            Self::Path(segments) => matches!(segments.as_slice(), [only] if only == "status"),
            Self::Raw(raw) => raw.trim() == "status",
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(segments) => f.write_str(&segments.join("/")),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

/// A command together with its parameters, ready to be encoded by a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// The command to invoke.
    pub command: Command,
    /// Named parameters in encoding order.
    pub params: Params,
}

impl Request {
    /// A structured request; an empty path is rejected before any I/O.
    pub fn new(command: Command, params: Params) -> Result<Self, UsageError> {
        if let Command::Path(segments) = &command {
            if segments.is_empty() {
                return Err(UsageError::EmptyCommand);
            }
        }
        Ok(Self { command, params })
    }

    /// A request without parameters for a fixed command path.
    pub(crate) fn simple(segments: &[&str]) -> Self {
        Self::with_params(segments, Params::new())
    }

    /// A request for a fixed, non-empty command path.
    pub(crate) fn with_params(segments: &[&str], params: Params) -> Self {
        debug_assert!(!segments.is_empty());
        Self {
            command: Command::path(segments.iter().copied()),
            params,
        }
    }

    /// A raw request, bypassing structured encoding.
    pub fn raw(command: impl Into<String>) -> Self {
        Self {
            command: Command::raw(command),
            params: Params::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_status_command() {
        assert!(Command::path(["status"]).is_status());
        assert!(Command::raw("status\n").is_status());
        assert!(!Command::path(["mount", "status"]).is_status());
        assert!(!Command::path(["mount", "stop"]).is_status());
    }

    #[test]
    fn empty_path_is_a_usage_error() {
        assert_eq!(
            Request::new(Command::Path(Vec::new()), Params::new()),
            Err(UsageError::EmptyCommand)
        );
    }

    #[test]
    fn displays_path_joined() {
        assert_eq!(
            Command::path(["mount", "goto_alt_az"]).to_string(),
            "mount/goto_alt_az"
        );
    }
}
