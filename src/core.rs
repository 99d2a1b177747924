pub mod configuration;
pub mod interval;
pub mod record;
pub mod series;
pub mod snapshot;
pub mod unit;
