use crate::api::Error;
use crate::inverter::Inverter;
use crate::model::{AggregateData, MetersAggregates, PowerFlow};
use chrono::{DateTime, Utc};

/// Outcome of one `/api/meters/aggregates` request.
///
/// When the inverter could not be read, `flow` is all-zero, `aggregates` is built from it and
/// `error` holds the cause. Dashboards polling the endpoint keep getting a well-formed payload.
#[derive(Debug)]
pub struct Reading {
    pub flow: PowerFlow,
    pub aggregates: MetersAggregates,
    pub error: Option<Error>,
}

impl Reading {
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Remap an inverter snapshot into the aggregates schema. The battery emulator reports load as
/// a positive draw, Fronius as negative, hence the sign flip. A zero load stays `0.0`, never
/// `-0.0`.
pub fn aggregates(flow: &PowerFlow, now: DateTime<Utc>) -> MetersAggregates {
    MetersAggregates {
        site: Some(AggregateData::instant(flow.grid, now)),
        battery: Some(AggregateData::instant(0.0, now)),
        load: Some(AggregateData::instant(0.0 - flow.load, now)),
        solar: Some(AggregateData::instant(flow.pv, now)),
    }
}

pub async fn read(inverter: &dyn Inverter) -> Reading {
    let (flow, error) = match inverter.power_flow().await {
        Ok(flow) => (flow, None),
        Err(e) => (PowerFlow::default(), Some(e)),
    };

    Reading {
        flow,
        aggregates: aggregates(&flow, Utc::now()),
        error,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::inverter::InverterType;
    use async_trait::async_trait;

    struct Stub(Result<PowerFlow, Error>);

    #[async_trait]
    impl Inverter for Stub {
        fn inverter_type(&self) -> InverterType {
            InverterType::Fronius
        }

        async fn power_flow(&self) -> Result<PowerFlow, Error> {
            self.0.clone()
        }
    }

    fn instant_power(data: &Option<AggregateData>) -> f64 {
        data.as_ref().map(|d| d.instant_power).unwrap()
    }

    #[test]
    fn remaps_power_flow() {
        let flow = PowerFlow {
            grid: -1523.4,
            load: -794.6,
            pv: 2318.0,
        };
        let output = aggregates(&flow, Utc::now());

        assert_eq!(-1523.4, instant_power(&output.site));
        assert_eq!(794.6, instant_power(&output.load));
        assert_eq!(2318.0, instant_power(&output.solar));
        assert_eq!(0.0, instant_power(&output.battery));
    }

    #[test]
    fn zero_load_is_positive_zero() {
        let output = aggregates(&PowerFlow::default(), Utc::now());
        let load = instant_power(&output.load);
        assert_eq!(0.0, load);
        assert!(load.is_sign_positive());
    }

    #[test]
    fn only_instant_power_is_populated() {
        let now = Utc::now();
        let output = aggregates(
            &PowerFlow {
                grid: 1.0,
                load: -2.0,
                pv: 3.0,
            },
            now,
        );

        let site = output.site.unwrap();
        assert_eq!(now, site.last_communication_time);
        assert_eq!(
            AggregateData {
                last_communication_time: now,
                instant_power: 1.0,
                ..Default::default()
            },
            site
        );
    }

    #[tokio::test]
    async fn read_success() {
        let start = Utc::now();
        let reading = read(&Stub(Ok(PowerFlow {
            grid: 300.0,
            load: -450.0,
            pv: 150.0,
        })))
        .await;

        assert!(!reading.is_degraded());
        assert_eq!(300.0, instant_power(&reading.aggregates.site));
        assert_eq!(450.0, instant_power(&reading.aggregates.load));
        assert_eq!(150.0, instant_power(&reading.aggregates.solar));

        for section in [
            &reading.aggregates.site,
            &reading.aggregates.battery,
            &reading.aggregates.load,
            &reading.aggregates.solar,
        ] {
            let time = section.as_ref().unwrap().last_communication_time;
            assert!(time >= start && time <= Utc::now());
        }
    }

    #[tokio::test]
    async fn read_failure_falls_back_to_zero() {
        let reading = read(&Stub(Err(Error::ConnectionError(String::from(
            "connection refused",
        )))))
        .await;

        assert!(reading.is_degraded());
        assert_eq!(PowerFlow::default(), reading.flow);

        let json = serde_json::to_string(&reading.aggregates).unwrap();
        assert!(
            !json.contains("\"instant_power\":-0"),
            "negative zero in {}",
            json
        );
        for section in [
            &reading.aggregates.site,
            &reading.aggregates.battery,
            &reading.aggregates.load,
            &reading.aggregates.solar,
        ] {
            assert_eq!(0.0, instant_power(section));
        }
    }
}
