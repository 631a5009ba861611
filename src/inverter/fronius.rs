use super::{Inverter, InverterType};
use crate::api::{self, Error};
use crate::model::PowerFlow;
use async_trait::async_trait;
use reqwest::Client;

/// Fronius inverter reached through the local Solar API v1.
#[derive(Debug)]
pub struct Fronius {
    url: String,
    client: Client,
}

impl Fronius {
    pub fn new(url: String) -> Result<Fronius, Error> {
        Ok(Fronius {
            url,
            client: api::client()?,
        })
    }
}

#[async_trait]
impl Inverter for Fronius {
    fn inverter_type(&self) -> InverterType {
        InverterType::Fronius
    }

    async fn power_flow(&self) -> Result<PowerFlow, Error> {
        api::power_flow(&self.client, &self.url).await
    }
}
