pub mod endpoint;
pub mod error;
pub mod response;

use crate::model;
pub use error::Error;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use response::get_power_flow_realtime_data::GetPowerFlowRealtimeData;
use serde_json::Value;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(10);
const APPLICATION_JSON: &str = "application/json";

/// HTTP client for LAN-local inverters. Those serve self-signed certificates, so certificate
/// verification is off.
pub fn client() -> Result<Client, Error> {
    reqwest::ClientBuilder::new()
        .timeout(TIMEOUT)
        .danger_accept_invalid_certs(true)
        .build()
        .or(Err(Error::InternalError))
}

/// Map transport-level failures (refused connection, timeout, unreadable body) to Error
fn map_api_err(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::ConnectionError(format!("timed out after {}s", TIMEOUT.as_secs()))
    } else {
        Error::ConnectionError(error.to_string())
    }
}

/// Anything but `200 OK` is a failure, including other 2xx codes.
fn map_http_status(response: Response) -> Result<Response, Error> {
    match response.status() {
        http::StatusCode::OK => Ok(response),
        http::StatusCode::NOT_FOUND => Err(Error::ConnectionError(format!(
            "{} not found; is the Solar API enabled on the inverter?",
            response.url().path()
        ))),
        status => Err(Error::ConnectionError(format!(
            "inverter responded {}",
            status
        ))),
    }
}

/// GET `endpoint` relative to `base_url` and return the raw body of a `200 OK` response.
pub async fn request(
    client: &Client,
    base_url: &str,
    endpoint: &endpoint::Endpoint,
) -> Result<Vec<u8>, Error> {
    let url = format!("{}{}", base_url, endpoint);

    client
        .get(url)
        .header(ACCEPT, APPLICATION_JSON)
        .header(CONTENT_TYPE, APPLICATION_JSON)
        .send()
        .await
        .map_err(map_api_err)
        .map(map_http_status)??
        .bytes()
        .await
        .map_err(map_api_err)
        .map(|bytes| bytes.to_vec())
}

/// Fronius reports failures in `Head.Status` while still answering `200 OK`. Return an error
/// for any non-zero code, otherwise carry the `value` forward.
fn map_response_status(value: Value) -> Result<Value, Error> {
    let envelope = serde_json::from_value::<response::Envelope>(value.clone())
        .map_err(|e| Error::InvalidResponse(value.to_string(), e.to_string()))?;
    let status = envelope.head.status;
    let message = [status.reason, status.user_message]
        .iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");

    match num::FromPrimitive::from_u64(status.code) {
        Some(response::StatusCode::Okay) => Ok(value),
        Some(code) => Err(Error::ApiError(format!(
            "{:?} ({}): {}",
            code, status.code, message
        ))),
        None => Err(Error::ApiError(format!(
            "unknown status code {}: {}",
            status.code, message
        ))),
    }
}

async fn get(
    client: &Client,
    base_url: &str,
    endpoint: &endpoint::Endpoint,
) -> Result<Value, Error> {
    let body = request(client, base_url, endpoint).await?;

    log::trace!(
        "endpoint: {}, response: {}",
        endpoint,
        String::from_utf8_lossy(&body)
    );

    serde_json::from_slice::<Value>(&body)
        .map_err(|e| {
            Error::InvalidResponse(String::from_utf8_lossy(&body).into_owned(), e.to_string())
        })
        .map(map_response_status)?
}

/// Read realtime site power flow from a Fronius Solar API v1 device.
pub async fn power_flow(client: &Client, base_url: &str) -> Result<model::PowerFlow, Error> {
    let value = get(client, base_url, endpoint::POWER_FLOW_REALTIME_DATA).await?;

    serde_json::from_value::<GetPowerFlowRealtimeData>(value.clone())
        .map_err(|e| Error::InvalidResponse(value.to_string(), e.to_string()))
        .map(|response| {
            let site = response.body.data.site;
            if let Some(location) = site.meter_location.as_deref() {
                log::trace!("meter location: {}", location);
            }
            model::PowerFlow {
                grid: site.p_grid.unwrap_or_default(),
                load: site.p_load.unwrap_or_default(),
                pv: site.p_pv.unwrap_or_default(),
            }
        })
}
