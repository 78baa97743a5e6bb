//! Blocking bridge over the async `reqwest` client.
//!
//! The core collaborator traits are synchronous so the planner stays
//! embeddable anywhere. How a request is driven depends on the caller:
//!
//! - outside any runtime, on a current-thread runtime the client builds on
//!   first use and keeps;
//! - inside a multi-threaded runtime, on the ambient handle through
//!   [`tokio::task::block_in_place`];
//! - inside a current-thread runtime, on a short-lived runtime in a scoped
//!   worker thread, since that runtime cannot be blocked from within.
//!
//! The owned runtime is shut down in the background on drop, so clients can
//! be dropped from async code.

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use crate::error::{ClientBuildError, TransportError, convert_reqwest_error};

pub(crate) struct HttpBridge {
    client: Client,
    runtime: OnceLock<Runtime>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBridge")
            .field("client", &self.client)
            .field("owns_runtime", &self.runtime.get().is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Drop for HttpBridge {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl HttpBridge {
    pub(crate) fn new(user_agent: &str, timeout: Duration) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        Ok(Self {
            client,
            runtime: OnceLock::new(),
            timeout,
        })
    }

    /// Drive `future` to completion from synchronous code.
    ///
    /// # Errors
    ///
    /// Returns the future's own error, or [`TransportError::Runtime`] when
    /// no runtime could be started for it.
    pub(crate) fn block_on<T, F>(&self, future: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>> + Send,
        T: Send,
    {
        let Ok(handle) = Handle::try_current() else {
            return self.owned_runtime()?.block_on(future);
        };
        if handle.runtime_flavor() == RuntimeFlavor::MultiThread {
            return tokio::task::block_in_place(|| handle.block_on(future));
        }
        std::thread::scope(|scope| {
            scope
                .spawn(|| build_runtime()?.block_on(future))
                .join()
                .unwrap_or_else(|_| {
                    Err(TransportError::Runtime {
                        message: "request worker thread panicked".to_owned(),
                    })
                })
        })
    }

    fn owned_runtime(&self) -> Result<&Runtime, TransportError> {
        if let Some(runtime) = self.runtime.get() {
            return Ok(runtime);
        }
        let runtime = build_runtime()?;
        Ok(self.runtime.get_or_init(|| runtime))
    }

    /// `GET url` and decode a JSON body.
    pub(crate) async fn get_json<T>(&self, url: &Url) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert(&err, url))?;
        response.json().await.map_err(|err| TransportError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    /// `POST body` to `url` and decode a JSON body.
    pub(crate) async fn post_json<T>(&self, url: &Url, body: String) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| self.convert(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert(&err, url))?;
        response.json().await.map_err(|err| TransportError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    fn convert(&self, error: &reqwest::Error, url: &Url) -> TransportError {
        convert_reqwest_error(error, url.as_str(), self.timeout)
    }
}

fn build_runtime() -> Result<Runtime, TransportError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| TransportError::Runtime {
            message: err.to_string(),
        })
}

/// Parse a configured endpoint.
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url, ClientBuildError> {
    Url::parse(endpoint).map_err(|source| ClientBuildError::InvalidUrl {
        url: endpoint.to_owned(),
        source,
    })
}
