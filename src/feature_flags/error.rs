use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum FeatureFlagError {
    StoreUnavailable(String),
    SerializationError(serde_json::Error),
}

impl fmt::Display for FeatureFlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureFlagError::StoreUnavailable(reason) => {
                write!(f, "Feature flag store unavailable: {}", reason)
            }
            FeatureFlagError::SerializationError(err) => {
                write!(f, "Serialization error: {}", err)
            }
        }
    }
}

impl Error for FeatureFlagError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FeatureFlagError::SerializationError(err) => Some(err),
            FeatureFlagError::StoreUnavailable(_) => None,
        }
    }
}

impl From<serde_json::Error> for FeatureFlagError {
    fn from(err: serde_json::Error) -> Self {
        FeatureFlagError::SerializationError(err)
    }
}
