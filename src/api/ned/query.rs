use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::core::{
    configuration::Configuration,
    interval::{Interval, format_utc},
};

/// Query parameters of the `utilizations` endpoint.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Query {
    pub point: u32,

    #[serde(rename = "type")]
    pub product_type: u32,

    pub activity: u32,

    pub classification: u8,

    pub granularity: u8,

    #[serde(rename = "granularitytimezone")]
    pub granularity_time_zone: u32,

    #[serde(rename = "validfrom[after]", serialize_with = "serialize_timestamp")]
    pub after: DateTime<Utc>,

    #[serde(rename = "validfrom[strictly_before]", serialize_with = "serialize_timestamp")]
    pub strictly_before: DateTime<Utc>,
}

impl Query {
    pub fn new(configuration: &Configuration, window: Interval) -> Self {
        Self {
            point: configuration.point,
            product_type: configuration.product_type,
            activity: configuration.activity,
            classification: configuration.classification.id(),
            granularity: configuration.granularity.id(),
            granularity_time_zone: configuration.granularity_time_zone,
            after: window.start,
            strictly_before: window.end,
        }
    }
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_utc(*timestamp))
}
