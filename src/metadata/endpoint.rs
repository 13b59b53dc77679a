use std::fmt::Formatter;
use std::str::FromStr;

use crate::errors::Error;
use crate::metadata::field::MetadataField;

/// Name of the virtual router serving metadata inside a CloudStack guest network.
pub const DEFAULT_ENDPOINT: &str = "data-server";

/// Base address of the metadata service. A bare host gets `http://`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    pub fn url_for(&self, field: MetadataField) -> String {
        format!("{}/latest/{}", self.base, field.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint {
            base: format!("http://{DEFAULT_ENDPOINT}"),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| Error::InvalidEndpoint(raw.to_string(), reason);

        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(invalid(String::from("empty address")));
        }

        let base = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };

        let url = reqwest::Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(Endpoint { base }),
            scheme => Err(invalid(format!("unsupported scheme {scheme}"))),
        }
    }
}
