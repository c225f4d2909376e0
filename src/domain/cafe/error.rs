//! Error taxonomy for every cafe operation.

use thiserror::Error;

/// The fixed set of failure classes a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingParameter,
    InvalidValue,
    IncorrectParameters,
    NotFound,
    Unauthorized,
    /// Backend fault (store unreachable etc.). Never caused by request input.
    Internal,
}

impl ErrorKind {
    /// Machine-readable slug carried in the `error` field of the envelope.
    pub fn slug(self) -> &'static str {
        match self {
            ErrorKind::MissingParameter => "missing parameter",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::IncorrectParameters => "incorrect parameters",
            ErrorKind::NotFound => "not found",
            ErrorKind::Unauthorized => "unauthorized request",
            ErrorKind::Internal => "internal error",
        }
    }

    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::MissingParameter
            | ErrorKind::InvalidValue
            | ErrorKind::IncorrectParameters => 400,
            ErrorKind::Unauthorized => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum CafeError {
    #[error("{0}")]
    MissingParameter(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("{0}")]
    IncorrectParameters(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("the request could not be completed, please try again later.")]
    Internal(#[source] anyhow::Error),
}

impl CafeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CafeError::MissingParameter(_) => ErrorKind::MissingParameter,
            CafeError::InvalidValue(_) => ErrorKind::InvalidValue,
            CafeError::IncorrectParameters(_) => ErrorKind::IncorrectParameters,
            CafeError::NotFound(_) => ErrorKind::NotFound,
            CafeError::Unauthorized(_) => ErrorKind::Unauthorized,
            CafeError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable message for the `message` field of the envelope.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Joins quoted parameter names for messages: `'a', 'b'`.
pub fn list_params<I, S>(params: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    params
        .into_iter()
        .map(|p| format!("'{}'", p.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(CafeError::NotFound("x".into()).kind().http_status(), 404);
        assert_eq!(CafeError::Unauthorized("x".into()).kind().http_status(), 403);
        assert_eq!(CafeError::InvalidValue("x".into()).kind().slug(), "invalid value");
        let internal = CafeError::Internal(anyhow::anyhow!("connection reset"));
        assert_eq!(internal.kind().http_status(), 500);
        assert!(!internal.message().contains("connection reset"));
    }

    #[test]
    fn params_are_quoted_and_comma_joined() {
        assert_eq!(list_params(["has_wifi", "seats"]), "'has_wifi', 'seats'");
        assert_eq!(list_params(Vec::<String>::new()), "");
    }
}
