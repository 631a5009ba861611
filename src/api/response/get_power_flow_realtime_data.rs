use serde::Deserialize;

/* `Body.Data.Site` of GetPowerFlowRealtimeData. Values the inverter cannot measure are null */
#[derive(Deserialize)]
pub struct Site {
    #[serde(rename = "P_Grid", default)]
    pub p_grid: Option<f64>,
    #[serde(rename = "P_Load", default)]
    pub p_load: Option<f64>,
    #[serde(rename = "P_PV", default)]
    pub p_pv: Option<f64>,
    #[serde(rename = "Meter_Location", default)]
    pub meter_location: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Data {
    pub site: Site,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Body {
    pub data: Data,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetPowerFlowRealtimeData {
    pub body: Body,
}
