use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{Instrument, debug, instrument, warn};

use crate::errors::{BatchError, Error, FieldError};
use crate::metadata::endpoint::Endpoint;
use crate::metadata::field::MetadataField;
use crate::metadata::record::MetadataRecord;
use crate::metadata::source::{DEFAULT_TIMEOUT, HttpSource, MetadataSource};

/// Fans metadata requests out over a shared source and gathers the answers
/// into a [`MetadataRecord`].
///
/// Holds no state besides the source, every batch is independent.
#[derive(Debug)]
pub struct MetadataClient<S: MetadataSource = HttpSource> {
    source: Arc<S>,
}

impl<S: MetadataSource> Clone for MetadataClient<S> {
    fn clone(&self) -> Self {
        MetadataClient {
            source: Arc::clone(&self.source),
        }
    }
}

impl MetadataClient<HttpSource> {
    pub fn new(endpoint: Endpoint) -> Result<Self, Error> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Endpoint, timeout: Duration) -> Result<Self, Error> {
        Ok(Self::from_source(HttpSource::new(endpoint, timeout)?))
    }
}

impl<S: MetadataSource> MetadataClient<S> {
    pub fn from_source(source: S) -> Self {
        MetadataClient {
            source: Arc::new(source),
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, field: MetadataField) -> Result<String, Error> {
        self.source
            .fetch(field)
            .await
            .map_err(|source| FieldError { field, source }.into())
    }

    pub async fn fetch_all(&self) -> Result<MetadataRecord, Error> {
        self.fetch_batch(&MetadataField::ALL).await
    }

    /// Fetch `fields` concurrently, one task per distinct field.
    ///
    /// Waits for every task before looking at any result. If any field fails
    /// the whole batch fails with all failures in catalog order and no record
    /// is returned. Dropping the returned future aborts the in-flight tasks.
    #[instrument(skip(self))]
    pub async fn fetch_batch(&self, fields: &[MetadataField]) -> Result<MetadataRecord, Error> {
        let mut requested: Vec<MetadataField> = Vec::with_capacity(fields.len());
        for field in fields {
            if !requested.contains(field) {
                requested.push(*field);
            }
        }

        let mut workers = JoinSet::new();
        for field in requested {
            let source = Arc::clone(&self.source);
            workers.spawn(
                async move { (field, source.fetch(field).await) }.in_current_span(),
            );
        }

        let mut values = Vec::with_capacity(workers.len());
        let mut failures = Vec::new();
        let mut crashed = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((field, Ok(value))) => {
                    debug!("{} fetched", field);
                    values.push((field, value));
                }
                Ok((field, Err(source))) => {
                    warn!("{} failed: {}", field, source);
                    failures.push(FieldError { field, source });
                }
                Err(join_error) => {
                    warn!("metadata worker died: {}", join_error);
                    if crashed.is_none() {
                        crashed = Some(join_error.to_string());
                    }
                }
            }
        }

        if !failures.is_empty() {
            failures.sort_by_key(|failure| failure.field);
            return Err(BatchError { failures }.into());
        }
        if let Some(reason) = crashed {
            return Err(Error::UnexpectedExit(reason));
        }

        let mut record = MetadataRecord::default();
        for (field, value) in values {
            *record.slot_mut(field) = Some(value);
        }
        Ok(record)
    }

    pub async fn service_offering(&self) -> Result<String, Error> {
        self.fetch(MetadataField::ServiceOffering).await
    }

    pub async fn availability_zone(&self) -> Result<String, Error> {
        self.fetch(MetadataField::AvailabilityZone).await
    }

    pub async fn local_ipv4(&self) -> Result<String, Error> {
        self.fetch(MetadataField::LocalIpv4).await
    }

    pub async fn local_hostname(&self) -> Result<String, Error> {
        self.fetch(MetadataField::LocalHostname).await
    }

    pub async fn public_ipv4(&self) -> Result<String, Error> {
        self.fetch(MetadataField::PublicIpv4).await
    }

    pub async fn public_hostname(&self) -> Result<String, Error> {
        self.fetch(MetadataField::PublicHostname).await
    }

    pub async fn instance_id(&self) -> Result<String, Error> {
        self.fetch(MetadataField::InstanceId).await
    }

    pub async fn user_data(&self) -> Result<String, Error> {
        self.fetch(MetadataField::UserData).await
    }
}
