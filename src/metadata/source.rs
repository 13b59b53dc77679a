use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::errors::{Error, TransportError};
use crate::metadata::endpoint::Endpoint;
use crate::metadata::field::MetadataField;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Anything that can answer a single metadata field.
#[async_trait]
pub trait MetadataSource: Send + Sync + 'static {
    async fn fetch(&self, field: MetadataField) -> Result<String, TransportError>;
}

/// Plain HTTP access to the metadata service. One GET per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpSource {
    endpoint: Endpoint,
    client: Client,
}

impl HttpSource {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Result<Self, Error> {
        // The service is link-local to the guest, never route it through a proxy
        let client = Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .map_err(Error::HttpClient)?;
        Ok(HttpSource { endpoint, client })
    }
}

#[async_trait]
impl MetadataSource for HttpSource {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch(&self, field: MetadataField) -> Result<String, TransportError> {
        let response = self
            .client
            .get(self.endpoint.url_for(field))
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        let bytes = response.bytes().await.map_err(TransportError::Body)?;
        debug!("{} bytes", bytes.len());
        String::from_utf8(bytes.to_vec()).map_err(TransportError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use warp::Filter;
    use warp::http::StatusCode;

    async fn serve(status: StatusCode, body: impl Into<Vec<u8>>) -> Endpoint {
        let body: Vec<u8> = body.into();
        let route = warp::path!("latest" / String)
            .and(warp::get())
            .map(move |_field: String| warp::reply::with_status(body.clone(), status));
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        format!("http://{addr}").parse().unwrap()
    }

    #[tokio::test]
    async fn returns_body_verbatim() {
        let endpoint = serve(StatusCode::OK, "i-12345").await;
        let source = HttpSource::new(endpoint, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(source.fetch(MetadataField::InstanceId).await.unwrap(), "i-12345");
    }

    #[tokio::test]
    async fn keeps_whitespace_and_newlines() {
        let endpoint = serve(StatusCode::OK, "  #cloud-config\nusers: []\n").await;
        let source = HttpSource::new(endpoint, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            source.fetch(MetadataField::UserData).await.unwrap(),
            "  #cloud-config\nusers: []\n"
        );
    }

    #[tokio::test]
    async fn non_utf8_body_is_rejected_not_rewritten() {
        let endpoint = serve(StatusCode::OK, vec![0x1f, 0x8b, 0x08, 0xff, 0x61]).await;
        let source = HttpSource::new(endpoint, DEFAULT_TIMEOUT).unwrap();
        match source.fetch(MetadataField::UserData).await {
            Err(TransportError::Decode(err)) => {
                assert_eq!(err.into_bytes(), vec![0x1f, 0x8b, 0x08, 0xff, 0x61]);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_a_transport_error() {
        let endpoint = serve(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let source = HttpSource::new(endpoint, DEFAULT_TIMEOUT).unwrap();
        let err = source.fetch(MetadataField::InstanceId).await.unwrap_err();
        assert!(matches!(err, TransportError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let endpoint: Endpoint = format!("127.0.0.1:{port}").parse().unwrap();
        let source = HttpSource::new(endpoint, DEFAULT_TIMEOUT).unwrap();
        let err = source.fetch(MetadataField::LocalIpv4).await.unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }
}
