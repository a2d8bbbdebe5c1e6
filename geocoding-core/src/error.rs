use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// Everything a geocoding query can fail with.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("access token not set")]
    AccessTokenNotSet,

    #[error("dataset required")]
    DatasetRequired,

    #[error("query required")]
    QueryRequired,

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-200 response carrying a JSON error document.
    #[error("geocoding API returned status {status}: {body}")]
    Api { status: u16, body: Value },

    /// Non-200 response whose body is not JSON.
    #[error("geocoding API returned status {status}: {body}")]
    ApiRaw { status: u16, body: String },

    /// 200 response whose body is not JSON.
    #[error("failed to decode geocoding response")]
    Decode(#[source] serde_json::Error),
}

impl GeocodeError {
    /// True for the precondition failures detected before any I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GeocodeError::AccessTokenNotSet
                | GeocodeError::DatasetRequired
                | GeocodeError::QueryRequired
        )
    }

    /// HTTP status for protocol errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            GeocodeError::Api { status, .. } | GeocodeError::ApiRaw { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_messages() {
        assert_eq!(GeocodeError::AccessTokenNotSet.to_string(), "access token not set");
        assert_eq!(GeocodeError::DatasetRequired.to_string(), "dataset required");
        assert_eq!(GeocodeError::QueryRequired.to_string(), "query required");
        assert!(GeocodeError::QueryRequired.is_configuration());
    }

    #[test]
    fn protocol_errors_expose_status() {
        let err = GeocodeError::ApiRaw {
            status: 502,
            body: "Bad Gateway".into(),
        };
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("502"));
        assert_eq!(GeocodeError::DatasetRequired.status(), None);
    }
}
