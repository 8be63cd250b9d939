use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Errors raised by [`crate::roster::Roster`] mutations and record construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("ID '{0}' already exists")]
    DuplicateId(String),
    #[error("account '{0}' already exists")]
    DuplicateAccount(String),
    #[error("{field} is too long ({len} bytes, at most {max} allowed)")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[derive(Debug)]
pub struct SimpleError(pub String);

impl SimpleError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SimpleError {}

pub fn simple_error(msg: impl Into<String>) -> DynError {
    Box::new(SimpleError::new(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_source_message() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let err = res.with_ctx(|| "open log file".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "open log file: missing");
    }

    #[test]
    fn roster_error_messages() {
        let e = RosterError::FieldTooLong { field: "ID", max: 29, len: 31 };
        assert_eq!(e.to_string(), "ID is too long (31 bytes, at most 29 allowed)");
        assert_eq!(RosterError::DuplicateId("A1".into()).to_string(), "ID 'A1' already exists");
    }
}
