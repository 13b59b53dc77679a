use std::str::FromStr;
use std::time::Duration;

use crate::errors::Error;
use crate::metadata::record::MetadataRecord;
use crate::metadata::source::DEFAULT_TIMEOUT;
use crate::metadata::{Endpoint, MetadataField};

pub const ENDPOINT_ENV: &str = "METADATA_ENDPOINT";
pub const TIMEOUT_ENV: &str = "METADATA_TIMEOUT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn render(&self, record: &MetadataRecord) -> Result<String, Error> {
        Ok(match self {
            OutputFormat::Json => serde_json::to_string(record)?,
            OutputFormat::Yaml => serde_yaml::to_string(record)?,
        })
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(Error::InvalidArgument(
                String::from("--format"),
                other.to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub endpoint: Endpoint,
    pub timeout: Duration,
    pub format: OutputFormat,
    /// Empty means every catalog field.
    pub fields: Vec<MetadataField>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: Endpoint::default(),
            timeout: DEFAULT_TIMEOUT,
            format: OutputFormat::default(),
            fields: Vec::new(),
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>, Error> {
    match args.iter().position(|arg| arg == flag) {
        None => Ok(None),
        Some(index) => args
            .get(index + 1)
            .filter(|value| !value.starts_with("--"))
            .map(|value| Some(value.as_str()))
            .ok_or_else(|| Error::MissingArgument(flag.to_string())),
    }
}

fn parse_timeout(source: &str, value: &str) -> Result<Duration, Error> {
    value
        .parse::<f64>()
        .ok()
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| Error::InvalidArgument(source.to_string(), value.to_string()))
}

impl Config {
    /// Build from command line flags, falling back to environment lookups via `env`.
    pub fn from_args<F>(args: &[String], env: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(endpoint) = flag_value(args, "--endpoint")? {
            config.endpoint = endpoint.parse()?;
        } else if let Some(endpoint) = env(ENDPOINT_ENV) {
            config.endpoint = endpoint.parse()?;
        }

        if let Some(timeout) = flag_value(args, "--timeout")? {
            config.timeout = parse_timeout("--timeout", timeout)?;
        } else if let Some(timeout) = env(TIMEOUT_ENV) {
            config.timeout = parse_timeout(TIMEOUT_ENV, &timeout)?;
        }

        if let Some(format) = flag_value(args, "--format")? {
            config.format = format.parse()?;
        }

        if let Some(fields) = flag_value(args, "--fields")? {
            config.fields = fields
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(MetadataField::from_str)
                .collect::<Result<_, _>>()?;
            if config.fields.is_empty() {
                return Err(Error::InvalidArgument(
                    String::from("--fields"),
                    fields.to_string(),
                ));
            }
        }

        Ok(config)
    }
}
