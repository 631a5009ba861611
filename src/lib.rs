pub mod api;
pub mod inverter;
pub mod model;
pub mod powerwall;

pub use api::Error;
