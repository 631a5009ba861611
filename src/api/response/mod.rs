pub mod get_power_flow_realtime_data;

use num_derive::FromPrimitive;
use serde::Deserialize;

/* Fronius Solar API v1 `Head.Status.Code` values */
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum StatusCode {
    Okay = 0,
    NotImplemented = 1,
    Uninitialized = 2,
    Initialized = 3,
    Running = 4,
    Timeout = 5,
    ArgumentError = 6,
    LnRequestError = 7,
    LnRequestTimeout = 8,
    LnParseError = 9,
    ConfigIoError = 10,
    NotSupported = 11,
    DeviceNotAvailable = 12,
    UnknownError = 255,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Status {
    pub code: u64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub user_message: Option<String>,
}

/* Envelope shared by every Solar API response */
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Head {
    pub status: Status,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    pub head: Head,
}

#[cfg(test)]
mod test {
    use super::get_power_flow_realtime_data::GetPowerFlowRealtimeData;
    use super::{Envelope, StatusCode};
    use std::fs;
    use std::path::PathBuf;

    fn read_resource(filename: &str) -> String {
        let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        d.push(format!("resources/test/{}", filename));
        fs::read_to_string(d.as_path()).unwrap()
    }

    #[test]
    fn get_power_flow_realtime_data() {
        let input = read_resource("GetPowerFlowRealtimeData.json");
        let output: GetPowerFlowRealtimeData = serde_json::from_str(&input).unwrap();
        let site = output.body.data.site;
        assert_eq!(Some(-1523.4), site.p_grid);
        assert_eq!(Some(-794.6), site.p_load);
        assert_eq!(Some(2318.0), site.p_pv);
        assert_eq!(Some("grid"), site.meter_location.as_deref());
    }

    #[test]
    fn get_power_flow_realtime_data_night() {
        let input = read_resource("GetPowerFlowRealtimeData_Night.json");
        let output: GetPowerFlowRealtimeData = serde_json::from_str(&input).unwrap();
        let site = output.body.data.site;
        assert_eq!(Some(412.3), site.p_grid);
        assert_eq!(Some(-412.3), site.p_load);
        assert_eq!(None, site.p_pv);
    }

    #[test]
    fn device_not_available_status() {
        let input = read_resource("GetPowerFlowRealtimeData_DeviceNotAvailable.json");
        let output: Envelope = serde_json::from_str(&input).unwrap();
        let code: Option<StatusCode> = num::FromPrimitive::from_u64(output.head.status.code);
        assert_eq!(Some(StatusCode::DeviceNotAvailable), code);
        assert_eq!(
            Some("Device not available"),
            output.head.status.reason.as_deref()
        );
    }

    #[test]
    #[should_panic]
    fn device_not_available_has_no_site() {
        let input = read_resource("GetPowerFlowRealtimeData_DeviceNotAvailable.json");
        let _output: GetPowerFlowRealtimeData = serde_json::from_str(&input).unwrap();
    }

    #[test]
    #[should_panic]
    fn get_power_flow_realtime_data_invalid_json() {
        let invalid_json_input = read_resource("invalid_json.json");
        let _invalid_json_output: GetPowerFlowRealtimeData =
            serde_json::from_str(&invalid_json_input).unwrap();
    }
}
