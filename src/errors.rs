use std::fmt::Formatter;

use crate::metadata::field::MetadataField;

/// A single GET against the metadata service that could not be completed.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("metadata service responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("response body is not valid UTF-8: {0}")]
    Decode(#[source] std::string::FromUtf8Error),
}

#[derive(thiserror::Error, Debug)]
#[error("failed to fetch {field}: {source}")]
pub struct FieldError {
    pub field: MetadataField,
    #[source]
    pub source: TransportError,
}

/// Every field that failed within one batch, sorted in catalog order.
#[derive(Debug)]
pub struct BatchError {
    pub(crate) failures: Vec<FieldError>,
}

impl BatchError {
    pub fn failures(&self) -> &[FieldError] {
        &self.failures
    }

    /// The failure with the lowest catalog position.
    pub fn first(&self) -> Option<&FieldError> {
        self.failures.first()
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.first().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.failures.as_slice() {
            [] => f.write_str("metadata batch failed"),
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more failed fields)", rest.len()),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // Metadata service
    #[error("{0}")]
    Fetch(#[from] FieldError),
    #[error("{0}")]
    Batch(#[from] BatchError),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("Unknown metadata field: {0}")]
    UnknownField(String),
    #[error("Invalid endpoint {0}: {1}")]
    InvalidEndpoint(String, String),

    // Configuration
    #[error("Missing value for {0}")]
    MissingArgument(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidArgument(String, String),

    // Misc libs
    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Trace exporter error: {0}")]
    Trace(#[from] opentelemetry::trace::TraceError),
    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    // Custom/generic
    #[error("Task ended unexpectedly: {0}")]
    UnexpectedExit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_failure(field: MetadataField, code: u16) -> FieldError {
        FieldError {
            field,
            source: TransportError::Status(
                reqwest::StatusCode::from_u16(code).expect("valid status"),
            ),
        }
    }

    #[test]
    fn batch_error_names_first_failure_and_count() {
        let err = BatchError {
            failures: vec![
                status_failure(MetadataField::LocalIpv4, 500),
                status_failure(MetadataField::UserData, 404),
            ],
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch local-ipv4: metadata service responded with 500 Internal Server Error (and 1 more failed fields)"
        );
        assert_eq!(err.first().map(|e| e.field), Some(MetadataField::LocalIpv4));
    }

    #[test]
    fn single_failure_displays_plainly() {
        let err = Error::from(BatchError {
            failures: vec![status_failure(MetadataField::InstanceId, 503)],
        });
        assert_eq!(
            err.to_string(),
            "failed to fetch instance-id: metadata service responded with 503 Service Unavailable"
        );
    }
}
