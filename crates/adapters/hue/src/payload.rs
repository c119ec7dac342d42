//! Wire shapes of the Hue REST v1 API.
//!
//! The bridge answers with HTTP 200 even when it refuses a request; the
//! refusal travels as a JSON array of `{"error": {...}}` envelopes where the
//! resource would otherwise be.

use std::collections::BTreeMap;

use serde::Deserialize;

use porchlight_domain::light::{LightId, LightInfo, LightName};

use crate::error::HueError;

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    kind: u32,
    #[serde(default)]
    address: String,
    #[serde(default)]
    description: String,
}

impl From<ApiError> for HueError {
    fn from(err: ApiError) -> Self {
        Self::Api {
            kind: err.kind,
            address: err.address,
            description: err.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reply<T> {
    Refused(Vec<ErrorEnvelope>),
    Resource(T),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, HueError> {
        match self {
            Self::Resource(value) => Ok(value),
            Self::Refused(errors) => Err(errors
                .into_iter()
                .next()
                .map_or(HueError::EmptyResult, |envelope| envelope.error.into())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LightState {
    #[serde(default)]
    on: bool,
}

#[derive(Debug, Deserialize)]
struct Light {
    name: String,
    state: LightState,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandResult {
    Success {
        #[allow(dead_code)]
        success: serde_json::Value,
    },
    Error {
        error: ApiError,
    },
}

fn decode<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, HueError> {
    serde_json::from_slice(body).map_err(HueError::PayloadParse)
}

/// Decode `GET /api/<user>/lights`.
///
/// Lights whose name is blank cannot be part of a group and are skipped.
///
/// # Errors
///
/// Returns [`HueError::Api`] when the bridge refused the request and
/// [`HueError::PayloadParse`] when the body is not a lights map.
pub fn parse_lights(body: &[u8]) -> Result<Vec<LightInfo>, HueError> {
    let lights = decode::<Reply<BTreeMap<String, Light>>>(body)?.into_result()?;
    Ok(lights
        .into_iter()
        .filter_map(|(id, light)| match LightName::new(&light.name) {
            Ok(name) => Some(LightInfo {
                id: LightId::new(id),
                name,
            }),
            Err(err) => {
                tracing::debug!(light_id = %id, %err, "skipping unnamed light");
                None
            }
        })
        .collect())
}

/// Decode `GET /api/<user>/lights/<id>` into the light's on flag.
///
/// # Errors
///
/// Returns [`HueError::Api`] when the bridge refused the request and
/// [`HueError::PayloadParse`] when the body is not a light.
pub fn parse_light_on(body: &[u8]) -> Result<bool, HueError> {
    let light = decode::<Reply<Light>>(body)?.into_result()?;
    Ok(light.state.on)
}

/// Decode the answer to `PUT /api/<user>/lights/<id>/state`.
///
/// # Errors
///
/// Returns the first [`HueError::Api`] in the result list, or
/// [`HueError::EmptyResult`] when the list is empty.
pub fn parse_command_reply(body: &[u8]) -> Result<(), HueError> {
    let results = decode::<Vec<CommandResult>>(body)?;
    if results.is_empty() {
        return Err(HueError::EmptyResult);
    }
    for result in results {
        if let CommandResult::Error { error } = result {
            return Err(error.into());
        }
    }
    Ok(())
}
