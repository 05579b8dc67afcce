//! HTTP client for the WebHDFS gateway.

use binmap_core::{BinmapError, BinmapResult, GatewayError, HdfsConfig};
use reqwest::{header, redirect::Policy, Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::exchange::Exchange;

/// Client for a WebHDFS-style HTTP gateway.
///
/// Redirects are never followed automatically: the two legs of a write
/// need different payload treatment, so redirect targets are consumed
/// manually and at most one hop is taken per operation. Every request
/// carries the configured timeout.
pub struct HdfsClient {
    client: Client,
    host: String,
    user: String,
}

impl HdfsClient {
    pub fn new(config: &HdfsConfig) -> BinmapResult<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Transport {
                op: "client init",
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            host: config.host.clone(),
            user: config.user.clone(),
        })
    }

    fn op_url(&self, path: &str, op: &str) -> String {
        format!(
            "{}/webhdfs/v1{}?op={}&user.name={}",
            self.host, path, op, self.user
        )
    }

    /// Create a directory (and any missing parents) on the gateway.
    ///
    /// Best-effort by contract: MKDIRS responses differ across gateway
    /// versions and "already exists" is indistinguishable from success,
    /// so every outcome is logged and discarded. Callers must not branch
    /// on this operation.
    pub async fn ensure_dir(&self, path: &str) {
        let url = self.op_url(path, "MKDIRS");
        debug!(%url, "hdfs mkdirs");
        match self.client.put(&url).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!(status = %response.status(), path, "mkdirs returned non-success")
            }
            Err(e) => warn!(error = %e, path, "mkdirs request failed"),
        }
    }

    /// Create or overwrite a file with the given content.
    ///
    /// The payload rides on the first request as well as the redirected
    /// one: a redirecting namenode ignores the first body, while a
    /// direct-answering gateway persists it — so both contracts see the
    /// data. Success is a 2xx on the terminal request of whichever
    /// contract applied.
    pub async fn write_file(&self, path: &str, data: Vec<u8>) -> BinmapResult<()> {
        self.ensure_dir(&parent_dir(path)).await;

        let url = format!("{}&overwrite=true", self.op_url(path, "CREATE"));
        debug!(%url, bytes = data.len(), "hdfs create");
        let first = self
            .client
            .put(&url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(data.clone())
            .send()
            .await
            .map_err(|e| transport("CREATE", e))?;

        match Exchange::classify("CREATE", first)? {
            Exchange::Redirect { location } => {
                debug!(%location, "create redirected to datanode");
                let upload = self
                    .client
                    .put(&location)
                    .header(header::CONTENT_TYPE, "application/octet-stream")
                    .body(data)
                    .send()
                    .await
                    .map_err(|e| transport("CREATE upload", e))?;
                expect_success("CREATE upload", upload).await
            }
            Exchange::Direct(response) => expect_success("CREATE", response).await,
        }
    }

    /// Read a file's content, or `None` when the remote path does not
    /// exist. Absence is a distinguished result, never an error.
    pub async fn read_file(&self, path: &str) -> BinmapResult<Option<String>> {
        let url = self.op_url(path, "OPEN");
        debug!(%url, "hdfs open");
        let first = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport("OPEN", e))?;

        match Exchange::classify("OPEN", first)? {
            Exchange::Redirect { location } => {
                debug!(%location, "open redirected to datanode");
                let response = self
                    .client
                    .get(&location)
                    .send()
                    .await
                    .map_err(|e| transport("OPEN fetch", e))?;
                read_body("OPEN fetch", response).await
            }
            Exchange::Direct(response) => read_body("OPEN", response).await,
        }
    }
}

impl std::fmt::Debug for HdfsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdfsClient")
            .field("host", &self.host)
            .field("user", &self.user)
            .finish()
    }
}

fn transport(op: &'static str, err: reqwest::Error) -> BinmapError {
    GatewayError::Transport {
        op,
        message: err.to_string(),
    }
    .into()
}

async fn expect_success(op: &'static str, response: Response) -> BinmapResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(failure(op, status, response).await)
}

async fn read_body(op: &'static str, response: Response) -> BinmapResult<Option<String>> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if status.is_success() {
        return response
            .text()
            .await
            .map(Some)
            .map_err(|e| transport(op, e));
    }
    Err(failure(op, status, response).await)
}

async fn failure(op: &'static str, status: StatusCode, response: Response) -> BinmapError {
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    GatewayError::RequestFailed {
        op,
        status: status.as_u16(),
        message,
    }
    .into()
}

fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        None | Some(0) => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}
