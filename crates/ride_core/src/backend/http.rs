//! Reqwest-backed session backend.
//!
//! Owns transport details only: endpoint resolution, bearer authentication,
//! timeout, status mapping and profile decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;

use super::response::{classify_status, parse_identity};
use super::{BackendError, SessionBackend, VerificationRequest};
use crate::config::{ClientConfig, ConfigError};
use crate::identity::Identity;
use crate::role::RoleCapability;
use crate::session::Credential;

#[derive(Debug, Error)]
pub enum BackendBuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP client for the profile and logout endpoints of one backend.
#[derive(Debug, Clone)]
pub struct HttpSessionBackend {
    client: Client,
    base_url: Url,
}

impl HttpSessionBackend {
    /// Create a backend for `base_url` (e.g. `http://localhost:4000`).
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.clone(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, BackendBuildError> {
        config.validate()?;
        let base_url = config.backend_url()?;
        Ok(Self::new(&base_url, config.request_timeout())?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        endpoint_url(&self.base_url, path)
    }
}

/// Append `path` to the base URL's path, segment by segment.
fn endpoint_url(base_url: &Url, path: &str) -> Result<Url, BackendError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| BackendError::transport(format!("base URL `{base_url}` cannot carry a path")))?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

fn map_transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::transport("request timed out")
    } else {
        BackendError::transport(err.to_string())
    }
}

#[async_trait]
impl SessionBackend for HttpSessionBackend {
    async fn verify(&self, request: &VerificationRequest) -> Result<Identity, BackendError> {
        let url = self.endpoint(request.capability.verify_endpoint)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(request.credential.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        if let Some(err) = classify_status(response.status().as_u16()) {
            return Err(err);
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        parse_identity(request.capability.role, body.as_ref())
    }

    async fn logout(
        &self,
        capability: &RoleCapability,
        credential: &Credential,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(capability.logout_endpoint)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(map_transport_error)?;

        match classify_status(response.status().as_u16()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
