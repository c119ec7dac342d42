//! # porchlight-adapter-hue
//!
//! Philips Hue adapter — drives lights through a Hue bridge's local REST
//! (v1) API.
//!
//! ## Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | List lights | `GET /api/<user>/lights` |
//! | Read one light | `GET /api/<user>/lights/<id>` |
//! | Switch one light | `PUT /api/<user>/lights/<id>/state` with `{"on": bool}` |
//!
//! The bridge address and username are configured; discovery and the
//! link-button pairing flow are out of scope.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `porchlight-app` and `porchlight-domain`.

mod config;
mod error;
pub mod payload;

pub use config::HueConfig;
pub use error::HueError;

use std::time::Duration;

use serde::Serialize;

use porchlight_app::ports::LightBridge;
use porchlight_domain::error::DeviceError;
use porchlight_domain::light::{LightId, LightInfo};

#[derive(Debug, Serialize)]
struct SetState {
    on: bool,
}

/// [`LightBridge`] backed by a Hue bridge on the local network.
#[derive(Debug, Clone)]
pub struct HueBridge {
    client: reqwest::Client,
    api_root: String,
}

impl HueBridge {
    /// Build a bridge client from configuration.
    ///
    /// No request is sent until the first port call.
    ///
    /// # Errors
    ///
    /// Returns [`HueError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &HueConfig) -> Result<Self, HueError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;
        Ok(Self {
            client,
            api_root: config.api_root(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_root)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, HueError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HueError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

impl LightBridge for HueBridge {
    async fn lights(&self) -> Result<Vec<LightInfo>, DeviceError> {
        let body = self.send(self.client.get(self.url("lights"))).await?;
        let lights = payload::parse_lights(&body)?;
        tracing::debug!(count = lights.len(), "listed hue lights");
        Ok(lights)
    }

    async fn is_on(&self, id: &LightId) -> Result<bool, DeviceError> {
        let body = self
            .send(self.client.get(self.url(&format!("lights/{id}"))))
            .await?;
        Ok(payload::parse_light_on(&body)?)
    }

    async fn set_on(&self, id: &LightId, on: bool) -> Result<(), DeviceError> {
        let request = self
            .client
            .put(self.url(&format!("lights/{id}/state")))
            .json(&SetState { on });
        let body = self.send(request).await?;
        payload::parse_command_reply(&body)?;
        tracing::debug!(light_id = %id, on, "hue light switched");
        Ok(())
    }
}
