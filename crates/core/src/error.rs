use std::fmt;

/// Failure of one request pipeline. Each layer produces its own variant
/// deliberately; callers switch on the tag and never probe an opaque value.
#[derive(Debug, Clone)]
pub enum ServiceError {
    /// Malformed query parameters. Carries every violated rule, not just the
    /// first one encountered.
    Validation { violations: Vec<String> },
    /// Transport failure or non-success response from the upstream feed.
    /// `status` is the upstream's own status code when it supplied one.
    Upstream {
        status: Option<u16>,
        message: String,
    },
    /// Anything that escaped the two categories above.
    Internal { message: String },
}

impl ServiceError {
    pub fn validation(violations: Vec<String>) -> Self {
        Self::Validation { violations }
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { violations } => {
                write!(f, "{}", violations.join("; "))
            }
            Self::Upstream { status, message } => match status {
                Some(code) => write!(f, "upstream feed HTTP {code}: {message}"),
                None => write!(f, "upstream feed unreachable: {message}"),
            },
            Self::Internal { message } => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for ServiceError {}
