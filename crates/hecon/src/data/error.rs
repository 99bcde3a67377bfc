/// Errors raised while reading inputs or writing artifacts
#[derive(Debug)]
pub enum DataError {
    Io(String),
    Parse(String),
    Csv(String),
    Serialize(String),
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Io(msg) => write!(f, "IO error: {msg}"),
            DataError::Parse(msg) => write!(f, "Parse error: {msg}"),
            DataError::Csv(msg) => write!(f, "CSV error: {msg}"),
            DataError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {}
