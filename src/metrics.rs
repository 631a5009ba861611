use fake_powerwall::model::PowerFlow;
use prometheus::{Encoder, Gauge, IntCounter, TextEncoder};

lazy_static! {
    static ref GRID_POWER_GAUGE: Gauge = register_gauge!(opts!(
        "grid_power",
        "last grid power reported by the inverter (in W, positive is import)",
    ))
    .unwrap();
    static ref LOAD_POWER_GAUGE: Gauge = register_gauge!(opts!(
        "load_power",
        "last load power reported by the inverter (in W, as reported)",
    ))
    .unwrap();
    static ref SOLAR_POWER_GAUGE: Gauge = register_gauge!(opts!(
        "solar_power",
        "last photovoltaic power reported by the inverter (in W)",
    ))
    .unwrap();
    static ref UPSTREAM_ERRORS_COUNTER: IntCounter = register_int_counter!(opts!(
        "upstream_errors_total",
        "aggregates requests answered with zero values because the inverter could not be read",
    ))
    .unwrap();
}

/// Register all collectors so `/metrics` lists them before the first request.
pub fn register() {
    lazy_static::initialize(&GRID_POWER_GAUGE);
    lazy_static::initialize(&LOAD_POWER_GAUGE);
    lazy_static::initialize(&SOLAR_POWER_GAUGE);
    lazy_static::initialize(&UPSTREAM_ERRORS_COUNTER);
}

/// Record a successful inverter reading.
pub fn observe(flow: &PowerFlow) {
    GRID_POWER_GAUGE.set(flow.grid);
    LOAD_POWER_GAUGE.set(flow.load);
    SOLAR_POWER_GAUGE.set(flow.pv);
}

/// Record a degraded response. Gauges keep the last good values.
pub fn upstream_failed() {
    UPSTREAM_ERRORS_COUNTER.inc();
}

/// Read metrics from Prometheus exporter registry.
pub fn read() -> Result<String, fake_powerwall::Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .or(Err(fake_powerwall::Error::FormatError))?;
    String::from_utf8(buffer).or(Err(fake_powerwall::Error::FormatError))
}
