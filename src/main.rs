#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
#[macro_use]
extern crate rocket;

use clap::Parser;
use config::Config;
use fake_powerwall::inverter::{self, Inverter};
use fake_powerwall::model::InverterSettings;
use fake_powerwall::{api, powerwall};
use rocket::http::ContentType;
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::{Build, Rocket, State};
use std::io::Cursor;

mod metrics;

const LISTEN_PORT: u16 = 8080;
const DEFAULT_INVERTER: &str = "http://192.168.1.50";
const UPSTREAM_STATUS_HEADER: &str = "X-Upstream-Status";
const FAVICON: &str = "data:image/x-icon;base64,iVBORw0KGgoAAAANSUhEUgAAABAAAAAQEAYAAABPYyMiAAAABmJLR0T///////8JWPfcAAAACXBIWXMAAABIAAAASABGyWs+AAAAF0lEQVRIx2NgGAWjYBSMglEwCkbBSAcACBAAAeaR9cIAAAAASUVORK5CYII=";

#[derive(Parser)]
#[command(author, version, about = "Serves a Powerwall style /api/meters/aggregates from a solar inverter")]
struct Args {
    /// URL or IP for the host
    #[arg(long, default_value = DEFAULT_INVERTER)]
    inverter: String,

    /// What type of inverter (fronius)
    #[arg(long = "inverter-type", default_value = "fronius")]
    inverter_type: String,

    /// Cloud based API?
    #[arg(long = "inverter-cloud")]
    inverter_cloud: bool,

    /// If inverter-type requires an auth token, define it here
    #[arg(long = "auth-token", default_value = "")]
    auth_token: String,
}

#[derive(Clone, serde::Deserialize)]
struct PowerwallConfig {
    host: String,
    #[serde(rename = "type")]
    inverter_type: String,
    cloud: bool,
    token: String,
}

/// Structure containing state for API handlers.
struct StateData {
    inverter: Box<dyn Inverter>,
}

/// Command line flags are the defaults, `INVERTER_HOST`, `INVERTER_TYPE`, `INVERTER_CLOUD` and
/// `AUTH_TOKEN` override them.
fn read_settings(args: Args) -> Result<PowerwallConfig, config::ConfigError> {
    let mut settings = Config::default();
    settings
        .set_default("host", args.inverter)?
        .set_default("type", args.inverter_type)?
        .set_default("cloud", args.inverter_cloud)?
        .set_default("token", args.auth_token)?;
    settings
        .merge(config::Environment::with_prefix("INVERTER"))?
        .merge(config::Environment::with_prefix("AUTH"))?;

    settings.try_into()
}

/// `/api/meters/aggregates` body. Always `200 OK`, a zero-filled payload is flagged through
/// `X-Upstream-Status`.
struct AggregatesResponse {
    body: String,
    degraded: bool,
}

impl<'r> Responder<'r, 'static> for AggregatesResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let upstream = if self.degraded { "unavailable" } else { "ok" };

        Response::build()
            .header(ContentType::JSON)
            .raw_header(UPSTREAM_STATUS_HEADER, upstream)
            .sized_body(self.body.len(), Cursor::new(self.body))
            .ok()
    }
}

struct Favicon;

impl<'r> Responder<'r, 'static> for Favicon {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let body = format!("{}\n", FAVICON);

        Response::build()
            .header(ContentType::new("image", "x-icon"))
            .raw_header("Cache-Control", "public, max-age=7776000")
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

#[get("/api/meters/aggregates")]
async fn meters_aggregates_route(
    state: &State<StateData>,
) -> Result<AggregatesResponse, api::Error> {
    let reading = powerwall::read(state.inverter.as_ref()).await;

    match &reading.error {
        Some(e) => {
            log::warn!(
                "serving zero aggregates, unable to read {} inverter: {}",
                state.inverter.inverter_type(),
                e
            );
            metrics::upstream_failed();
        }
        None => metrics::observe(&reading.flow),
    }

    let body = serde_json::to_string(&reading.aggregates).or(Err(api::Error::FormatError))?;

    Ok(AggregatesResponse {
        body: format!("{}\n", body),
        degraded: reading.is_degraded(),
    })
}

#[get("/favicon.ico")]
fn favicon_route() -> Favicon {
    Favicon
}

#[get("/metrics")]
fn metrics_route() -> Result<String, api::Error> {
    metrics::read()
}

fn build(inverter: Box<dyn Inverter>) -> Rocket<Build> {
    metrics::register();

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", LISTEN_PORT));

    rocket::custom(figment)
        .manage(StateData { inverter })
        .mount(
            "/",
            routes![meters_aggregates_route, favicon_route, metrics_route],
        )
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = read_settings(Args::parse())?;
    let settings = InverterSettings::new(
        &config.host,
        &config.inverter_type,
        config.cloud,
        &config.token,
    )?;
    let inverter = inverter::connect(&settings)?;

    log::info!("Starting Fake Powerwall");
    log::info!(
        "reading {} inverter at {}",
        settings.inverter_type,
        settings.url
    );

    let _rocket = build(inverter).launch().await?;
    Ok(())
}
