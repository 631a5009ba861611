pub type Endpoint = str;

/* Fronius Solar API v1 */
pub const POWER_FLOW_REALTIME_DATA: &Endpoint = "/solar_api/v1/GetPowerFlowRealtimeData.fcgi";
