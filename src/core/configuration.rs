use std::{
    fmt::{Debug, Formatter},
    ops::RangeInclusive,
    time::Duration,
};

use bon::Builder;
use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    core::{interval::Interval, unit::Unit},
    prelude::*,
};

pub const LOOKAHEAD_HOURS: RangeInclusive<u32> = 1..=168;
pub const POLL_INTERVAL_MINUTES: RangeInclusive<u32> = 5..=1440;

/// NED API key, sent verbatim in the `X-AUTH-TOKEN` header.
#[derive(Clone, Eq, PartialEq, derive_more::From, derive_more::FromStr)]
pub struct ApiKey(String);

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl ApiKey {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum Classification {
    #[default]
    #[value(alias = "1")]
    Forecast,

    #[value(alias = "2")]
    Actual,

    #[value(alias = "3")]
    Backcast,
}

impl Classification {
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Forecast => 1,
            Self::Actual => 2,
            Self::Backcast => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum Granularity {
    #[value(name = "15min", alias = "4")]
    QuarterHour,

    #[default]
    #[value(name = "hour", alias = "5")]
    Hour,

    #[value(name = "day", alias = "6")]
    Day,
}

impl Granularity {
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::QuarterHour => 4,
            Self::Hour => 5,
            Self::Day => 6,
        }
    }
}

/// Integration instance settings.
///
/// Immutable within a poll cycle, the coordinator takes a fresh copy on reconfiguration.
#[must_use]
#[derive(Clone, Debug, Builder)]
pub struct Configuration {
    #[builder(into)]
    pub api_key: ApiKey,

    /// Location point, `0` is the whole Netherlands.
    #[builder(default = 0)]
    pub point: u32,

    /// Product type, `27` is the electricity mix.
    #[builder(default = 27)]
    pub product_type: u32,

    /// Activity, `1` is the CO₂ emission factor.
    #[builder(default = 1)]
    pub activity: u32,

    #[builder(default)]
    pub classification: Classification,

    #[builder(default)]
    pub granularity: Granularity,

    /// Granularity time zone, `1` is CET.
    #[builder(default = 1)]
    pub granularity_time_zone: u32,

    #[builder(default = 24)]
    pub lookahead_hours: u32,

    #[builder(default = 30)]
    pub poll_interval_minutes: u32,

    #[builder(default)]
    pub unit: Unit,
}

impl Configuration {
    pub fn validate(self) -> Result<Self> {
        ensure!(!self.api_key.expose().is_empty(), "the API key must not be empty");
        ensure!(
            LOOKAHEAD_HOURS.contains(&self.lookahead_hours),
            "lookahead must be within {LOOKAHEAD_HOURS:?} hours, got {}",
            self.lookahead_hours,
        );
        ensure!(
            POLL_INTERVAL_MINUTES.contains(&self.poll_interval_minutes),
            "poll interval must be within {POLL_INTERVAL_MINUTES:?} minutes, got {}",
            self.poll_interval_minutes,
        );
        Ok(self)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_interval_minutes) * 60)
    }

    #[must_use]
    pub fn lookahead(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.lookahead_hours))
    }

    /// Request window of the poll cycle started at `now`.
    pub fn window(&self, now: DateTime<Utc>) -> Interval {
        Interval::starting_at(now, self.lookahead())
    }
}
