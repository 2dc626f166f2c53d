use log::{debug, error};
use measure_time::info_time;
use reqwest::StatusCode;

use crate::config::ClientConfig;
use crate::model::{NearestNeighbors, NodeId, NodeLookup, Route};
use crate::protocol::codec;
use crate::protocol::{Operation, ProtocolError, Reply};

#[cfg(feature = "tracing")]
use tracing::Level;

/// Anything able to carry an [`Operation`] to the backend and return the raw
/// response body.
///
/// The session is single-threaded, so implementations are not required to
/// produce `Send` futures.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn send(&self, operation: &Operation) -> Result<String, ProtocolError>;

    /// Sends the operation and decodes the body with the operation's grammar.
    async fn call(&self, operation: &Operation) -> Result<Reply, ProtocolError> {
        let body = self.send(operation).await?;
        Ok(operation.decode(&body)?)
    }
}

/// HTTP implementation of the wire protocol.
///
/// ```rust,ignore
/// use routeplanner::{ClientConfig, ProtocolClient};
/// let client = ProtocolClient::new(ClientConfig::new("http://localhost:8080"))?;
/// let neighbors = client.nearest(48.78, 9.18).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProtocolClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ProtocolClient {
    pub fn new(config: ClientConfig) -> Result<Self, ProtocolError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ProtocolError::Transport)?;

        Ok(ProtocolClient { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The full request url, e.g. `http://host/routeplanner?oto&pl&pd&pp`.
    pub fn url(&self, operation: &Operation) -> String {
        format!(
            "{}/{}?{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.path.trim_matches('/'),
            operation.query()
        )
    }

    pub async fn nearest(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<NearestNeighbors, ProtocolError> {
        let body = self
            .send(&Operation::NearestNeighbor {
                latitude,
                longitude,
            })
            .await?;

        Ok(codec::parse_nearest(&body)?)
    }

    pub async fn lookup(&self, id: NodeId) -> Result<NodeLookup, ProtocolError> {
        let body = self.send(&Operation::NodeById(id)).await?;
        Ok(codec::parse_lookup(&body)?)
    }

    pub async fn route(&self, start: NodeId, destination: NodeId) -> Result<Route, ProtocolError> {
        let body = self
            .send(&Operation::OneToOne { start, destination })
            .await?;

        Ok(codec::parse_route(&body)?)
    }
}

impl Backend for ProtocolClient {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err(level = Level::ERROR)))]
    async fn send(&self, operation: &Operation) -> Result<String, ProtocolError> {
        let url = self.url(operation);
        let timeout = operation.timeout(&self.config);

        info_time!("POST {url}");
        debug!("POST {url} body={:?} timeout={timeout:?}", operation.body());

        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .body(operation.body())
            .send()
            .await
            .map_err(|err| classify(err, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| classify(err, timeout))?;

        if status != StatusCode::OK {
            error!("Backend replied {status} to {url}");
            return Err(ProtocolError::Status {
                code: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

fn classify(err: reqwest::Error, timeout: std::time::Duration) -> ProtocolError {
    if err.is_timeout() {
        ProtocolError::Timeout(timeout)
    } else {
        ProtocolError::Transport(err)
    }
}
