use std::time::Duration;
use thiserror::Error;

/// HTTP status code reported by the PWI4 server.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// Wrap a raw HTTP status code.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Get the raw status code.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Whether this is a 5xx code.
    pub const fn is_server_error(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }
}

impl From<reqwest::StatusCode> for StatusCode {
    fn from(status: reqwest::StatusCode) -> Self {
        Self(status.as_u16())
    }
}

macro_rules! status_codes {
    ($(#[doc = $doc:literal] $name:ident = $value:literal,)*) => {
        impl StatusCode {
            $(
                #[doc = $doc]
                pub const $name: Self = Self($value);
            )*

            /// Human-readable description of the well-known codes.
            pub const fn description(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($doc),)*
                    _ => None,
                }
            }
        }

        impl std::fmt::Debug for StatusCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match *self {
                    $(
                        Self::$name => f.write_str(stringify!($name)),
                    )*
                    _ => write!(f, "HTTP {}", self.0),
                }
            }
        }
    };
}

status_codes! {
    #[doc = "OK"]
    OK = 200,
    #[doc = "Bad request"]
    BAD_REQUEST = 400,
    #[doc = "Command not found"]
    COMMAND_NOT_FOUND = 404,
    #[doc = "Internal server error (possibly a bug in PWI)"]
    INTERNAL_SERVER_ERROR = 500,
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.description() {
            Some(description) => write!(f, "{} ({description})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Malformed command arguments, detected before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// A TLE must consist of exactly three lines.
    #[error("TLE must have exactly 3 lines (name, line 1, line 2), got {count}")]
    TleLineCount {
        /// Number of lines that were supplied.
        count: usize,
    },
    /// A named TLE mapping is missing one of `line0`, `line1`, `line2`.
    #[error("TLE mapping is missing key {key:?}")]
    TleMissingKey {
        /// The missing key.
        key: &'static str,
    },
    /// A catalog ends in the middle of an entry.
    #[error("TLE catalog entry {name:?} is missing its element lines")]
    IncompleteCatalogEntry {
        /// Title line of the incomplete entry.
        name: String,
    },
    /// A structured command that has no equivalent in the TCP protocol.
    #[error("Command {command} isn't available over TCP")]
    NotSupportedOverTcp {
        /// The command path.
        command: String,
    },
    /// A command path without any segments.
    #[error("Command path is empty")]
    EmptyCommand,
    /// The configured base URL can't have path segments appended to it.
    #[error("{url} is not a valid base URL")]
    InvalidBaseUrl {
        /// The offending URL.
        url: String,
    },
    /// The request couldn't be turned into a URL.
    #[error("Couldn't build request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Failures of the underlying I/O exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-200 HTTP status.
    #[error("HTTP {code}: {reason}: {body}")]
    Status {
        /// Status code.
        code: StatusCode,
        /// Reason phrase.
        reason: String,
        /// Response body, usually a diagnostic message.
        body: String,
    },
    /// HTTP-level failure (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Http(#[source] reqwest::Error),
    /// Socket failure on the TCP transport.
    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),
    /// No complete reply within the allotted time.
    #[error("Timed out after {after:?} (partial reply: {partial:?})")]
    Timeout {
        /// Time budget that was exhausted.
        after: Duration,
        /// Whatever was received before the deadline.
        partial: String,
    },
    /// The server closed the connection.
    #[error("Connection closed by server (partial reply: {partial:?})")]
    Closed {
        /// Whatever was received before the connection was closed.
        partial: String,
    },
    /// The server answered a TCP command with an error line.
    #[error("Command rejected: {reply}")]
    Rejected {
        /// The reply line without its terminator.
        reply: String,
    },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

/// Failures while turning a response body into a status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A required status key is absent.
    #[error("Missing status key {key:?}")]
    MissingKey {
        /// The dotted key.
        key: &'static str,
    },
    /// A value couldn't be parsed into the expected type.
    #[error("Invalid value {value:?} for status key {key:?}: {reason}")]
    InvalidValue {
        /// The dotted key.
        key: &'static str,
        /// Raw value text.
        value: String,
        /// Parser error message.
        reason: String,
    },
    /// Geometry code outside of the known enumeration.
    #[error("Unknown mount geometry code {code:?}")]
    UnknownGeometry {
        /// Raw code text.
        code: String,
    },
    /// Response body is not valid UTF-8.
    #[error("Response is not valid UTF-8: {reason}")]
    InvalidUtf8 {
        /// Decoder error message.
        reason: String,
    },
    /// A non-blank line without `=` in strict parsing mode.
    #[error("Malformed response line {line_number}: {line:?}")]
    MalformedLine {
        /// 1-based line number.
        line_number: usize,
        /// The offending line.
        line: String,
    },
}

impl DecodeError {
    /// The status key this error refers to, if any.
    pub const fn key(&self) -> Option<&'static str> {
        match self {
            Self::MissingKey { key } | Self::InvalidValue { key, .. } => Some(*key),
            Self::UnknownGeometry { .. } => Some("mount.geometry"),
            Self::InvalidUtf8 { .. } | Self::MalformedLine { .. } => None,
        }
    }
}

/// Any error produced by a PWI4 client call.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`UsageError`].
    #[error(transparent)]
    Usage(#[from] UsageError),
    /// See [`TransportError`].
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// See [`DecodeError`].
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl Error {
    /// HTTP status code, if the server answered with one.
    pub const fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(TransportError::Status { code, .. }) => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if the server doesn't know the requested command.
    pub fn is_command_not_found(&self) -> bool {
        self.status_code() == Some(StatusCode::COMMAND_NOT_FOUND)
    }

    /// Returns `true` if the server rejected the request parameters.
    pub fn is_bad_request(&self) -> bool {
        self.status_code() == Some(StatusCode::BAD_REQUEST)
    }

    /// Returns `true` if the server failed while handling the request.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_some_and(StatusCode::is_server_error)
    }

    /// Returns `true` if retrying the same call might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(TransportError::Http(err)) => err.is_timeout() || err.is_connect(),
            Self::Transport(TransportError::Timeout { .. }) => true,
            _ => false,
        }
    }
}

/// Result type for PWI4 client calls.
pub type Result<T = (), E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_classified() {
        let not_found = Error::from(TransportError::Status {
            code: StatusCode::new(404),
            reason: "Not Found".to_owned(),
            body: String::new(),
        });
        assert!(not_found.is_command_not_found());
        assert!(!not_found.is_bad_request());
        assert!(!not_found.is_transient());

        let crash = Error::from(TransportError::Status {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            reason: "Internal Server Error".to_owned(),
            body: "Traceback".to_owned(),
        });
        assert!(crash.is_server_error());
        assert_eq!(
            crash.to_string(),
            "HTTP 500 (Internal server error (possibly a bug in PWI)): Internal Server Error: Traceback"
        );
    }

    #[test]
    fn unknown_codes_format_as_numbers() {
        let code = StatusCode::new(418);
        assert_eq!(code.description(), None);
        assert_eq!(format!("{code:?}"), "HTTP 418");
        assert_eq!(code.to_string(), "418");
        assert_eq!(format!("{:?}", StatusCode::BAD_REQUEST), "BAD_REQUEST");
    }

    #[test]
    fn decode_errors_name_their_key() {
        assert_eq!(
            DecodeError::MissingKey { key: "m3.port" }.key(),
            Some("m3.port")
        );
        assert_eq!(
            DecodeError::UnknownGeometry { code: "3".to_owned() }.key(),
            Some("mount.geometry")
        );
    }

    #[test]
    fn timeouts_are_transient() {
        let err = Error::from(TransportError::Timeout {
            after: Duration::from_secs(5),
            partial: String::new(),
        });
        assert!(err.is_transient());
        assert_eq!(err.status_code(), None);
    }
}
