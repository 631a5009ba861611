use crate::api::Error;
use crate::inverter::InverterType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Watts = f64;

#[derive(Debug, Clone)]
pub struct InverterSettings {
    pub url: String,
    pub inverter_type: InverterType,
    pub cloud: bool,
    pub auth_token: Option<String>,
}

impl InverterSettings {
    /// Validates the raw startup values. Unknown inverter types are rejected here so that a
    /// misconfigured process never starts serving.
    pub fn new(
        url: &str,
        inverter_type: &str,
        cloud: bool,
        auth_token: &str,
    ) -> Result<InverterSettings, Error> {
        let inverter_type = inverter_type.parse::<InverterType>()?;
        let url = normalize_url(url)?;
        let auth_token = Some(auth_token.trim())
            .filter(|token| !token.is_empty())
            .map(String::from);

        Ok(InverterSettings {
            url,
            inverter_type,
            cloud,
            auth_token,
        })
    }
}

/// Accepts either a URL or a bare host/IP. Endpoints are appended verbatim, so trailing slashes
/// are stripped.
fn normalize_url(url: &str) -> Result<String, Error> {
    let url = url.trim().trim_end_matches('/');

    if url.is_empty() {
        return Err(Error::ConfigError(String::from("inverter URL is empty")));
    }

    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(scheme))
    });

    if has_scheme {
        Ok(url.to_owned())
    } else {
        Ok(format!("http://{}", url))
    }
}

/// Instantaneous power flow reported by an inverter, in watts.
///
/// `grid` is positive while importing. `load` is negative while consuming, which is the
/// Fronius convention.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerFlow {
    pub grid: Watts,
    pub load: Watts,
    pub pv: Watts,
}

/// `/api/meters/aggregates` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetersAggregates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<AggregateData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<AggregateData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<AggregateData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar: Option<AggregateData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateData {
    pub last_communication_time: DateTime<Utc>,
    pub instant_power: Watts,
    pub instant_reactive_power: f64,
    pub instant_apparent_power: f64,
    pub frequency: f64,
    pub energy_exported: f64,
    pub energy_imported: f64,
    pub instant_average_voltage: f64,
    pub instant_total_current: i64,
    pub i_a_current: i64,
    pub i_b_current: i64,
    pub i_c_current: i64,
    pub timeout: i64,
}

impl AggregateData {
    pub fn instant(power: Watts, now: DateTime<Utc>) -> AggregateData {
        AggregateData {
            last_communication_time: now,
            instant_power: power,
            ..Default::default()
        }
    }
}
