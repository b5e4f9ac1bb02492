//! HTTP downstream client adapter.

use crate::lookup::{
    domain::{DownstreamError, DownstreamReply, LookupTarget},
    ports::DownstreamClient,
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use tracing::debug;

/// Queries services with `GET <address>/<path suffix>/<identifier>`.
///
/// The identifier is percent-encoded as a single path segment. Every HTTP
/// status is returned as a reply; only transport failures become errors.
#[derive(Debug, Clone)]
pub struct HttpDownstreamClient {
    client: Client,
    path_suffix: String,
}

impl HttpDownstreamClient {
    /// Creates a client whose calls are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the client construction error when the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration, path_suffix: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            path_suffix: path_suffix.into(),
        })
    }

    fn lookup_url(&self, target: &LookupTarget, identifier: &str) -> Result<Url, DownstreamError> {
        let mut url = Url::parse(target.address().as_str())
            .map_err(|err| DownstreamError::Transport(format!("invalid service address: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                DownstreamError::Transport(format!(
                    "service address cannot take a path: {}",
                    target.address()
                ))
            })?
            .pop_if_empty()
            .extend(self.path_suffix.split('/').filter(|part| !part.is_empty()))
            .push(identifier);
        Ok(url)
    }
}

#[async_trait]
impl DownstreamClient for HttpDownstreamClient {
    async fn fetch(
        &self,
        target: &LookupTarget,
        identifier: &str,
    ) -> Result<DownstreamReply, DownstreamError> {
        let url = self.lookup_url(target, identifier)?;
        debug!(service = %target.name(), %url, "dispatching lookup");

        let response = self.client.get(url).send().await.map_err(|err| classify(&err))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| classify(&err))?;
        Ok(DownstreamReply { status, body })
    }
}

fn classify(err: &reqwest::Error) -> DownstreamError {
    if err.is_timeout() {
        DownstreamError::TimedOut
    } else if is_connection_refused(err) {
        DownstreamError::Refused
    } else {
        DownstreamError::Transport(err.to_string())
    }
}

fn is_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(cause) = current {
        if let Some(io_err) = cause.downcast_ref::<io::Error>()
            && io_err.kind() == io::ErrorKind::ConnectionRefused
        {
            return true;
        }
        current = cause.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::domain::{BaseAddress, ServiceId, ServiceName};
    use crate::test_support::{refused_address, serve_router};
    use axum::{Router, extract::Path, http::StatusCode, routing::get};

    fn client(timeout: Duration) -> HttpDownstreamClient {
        HttpDownstreamClient::new(timeout, "aries").expect("client should build")
    }

    fn target(address: &str) -> LookupTarget {
        LookupTarget::new(
            ServiceId::new(1),
            ServiceName::new("Virgo").expect("valid name"),
            BaseAddress::new(address).expect("valid address"),
        )
    }

    async fn echo_service() -> String {
        serve_router(Router::new().route(
            "/aries/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "missing" {
                    (StatusCode::NOT_FOUND, "not found".to_owned())
                } else {
                    (StatusCode::OK, format!(r#"{{"id":"{id}"}}"#))
                }
            }),
        ))
        .await
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn success_reply_is_returned_verbatim() {
        let address = echo_service().await;

        let reply = client(Duration::from_secs(2))
            .fetch(&target(&address), "u123")
            .await
            .expect("fetch should succeed");

        assert_eq!(reply, DownstreamReply::new(200, r#"{"id":"u123"}"#));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn identifier_is_sent_as_one_encoded_segment() {
        let address = echo_service().await;

        let reply = client(Duration::from_secs(2))
            .fetch(&target(&address), "a b/c?d")
            .await
            .expect("fetch should succeed");

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, r#"{"id":"a b/c?d"}"#);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn error_status_is_an_answer_not_a_failure() {
        let address = echo_service().await;

        let reply = client(Duration::from_secs(2))
            .fetch(&target(&address), "missing")
            .await
            .expect("error statuses are replies");

        assert_eq!(reply, DownstreamReply::new(404, "not found"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn slow_service_times_out() {
        let address = serve_router(Router::new().route(
            "/aries/{id}",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            }),
        ))
        .await;

        let result = client(Duration::from_millis(200))
            .fetch(&target(&address), "u123")
            .await;

        assert_eq!(result, Err(DownstreamError::TimedOut));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn refused_connection_is_reported_offline() {
        let address = refused_address().await;

        let result = client(Duration::from_secs(2))
            .fetch(&target(&address), "u123")
            .await;

        assert_eq!(result, Err(DownstreamError::Refused));
    }

    #[test]
    fn base_path_is_preserved() {
        let lookup = client(Duration::from_secs(1));

        let url = lookup
            .lookup_url(&target("http://library.example.edu/catalog"), "u 1")
            .expect("url should build");

        assert_eq!(url.as_str(), "http://library.example.edu/catalog/aries/u%201");
    }
}
