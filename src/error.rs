/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for document generation
#[derive(Debug)]
pub enum Error {
    /// A structural tag on a registered type's field could not be parsed.
    /// The one fatal error: a malformed tag is a programmer error in static
    /// metadata, not a runtime documentation gap.
    MalformedTag {
        type_name: String,
        field: String,
        message: String,
    },
    Serialization(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MalformedTag {
                type_name,
                field,
                message,
            } => {
                write!(
                    f,
                    "malformed structural tag on {}.{}: {}",
                    type_name, field, message
                )
            }
            Error::Serialization(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON error: {}", err))
    }
}
