mod fronius;

use crate::api::Error;
use crate::model::{InverterSettings, PowerFlow};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub use fronius::Fronius;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InverterType {
    Fronius,
}

impl FromStr for InverterType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fronius" => Ok(InverterType::Fronius),
            _ => Err(Error::UnsupportedInverter(s.to_owned())),
        }
    }
}

impl fmt::Display for InverterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InverterType::Fronius => write!(f, "fronius"),
        }
    }
}

/// Source of realtime power-flow snapshots, one implementation per inverter vendor.
#[async_trait]
pub trait Inverter: Send + Sync {
    fn inverter_type(&self) -> InverterType;

    async fn power_flow(&self) -> Result<PowerFlow, Error>;
}

/// Build the inverter described by `settings`.
pub fn connect(settings: &InverterSettings) -> Result<Box<dyn Inverter>, Error> {
    match settings.inverter_type {
        InverterType::Fronius => {
            if settings.cloud {
                log::warn!("fronius inverters only expose a local API; ignoring cloud flag");
            }
            if settings.auth_token.is_some() {
                log::warn!("fronius inverters do not use an auth token; ignoring it");
            }
            Ok(Box::new(Fronius::new(settings.url.to_owned())?))
        }
    }
}
