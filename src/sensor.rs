//! Read-only sensors on top of the coordinator updates.

mod publisher;

use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value, json};
use serde_with::{DisplayFromStr, serde_as};
use tokio::sync::watch;

pub use self::publisher::Publisher;
use crate::{
    coordinator::{Registry, Update},
    core::{
        record::Record,
        series::Series,
        unit::{Unit, round_to},
    },
    prelude::*,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum State {
    Value(f64),

    /// There is a snapshot, but it lacks the record.
    Unknown,

    /// No snapshot has ever been produced.
    Unavailable,
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => Display::fmt(value, f),
            Self::Unknown => write!(f, "unknown"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Entity state in the shape of the Home Assistant REST API.
#[serde_as]
#[derive(Clone, Debug, Serialize)]
pub struct EntityState {
    #[serde(skip)]
    pub entity_id: String,

    #[serde_as(as = "DisplayFromStr")]
    pub state: State,

    pub attributes: Map<String, Value>,
}

/// Destination of the rendered sensor states.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn publish(&self, state: &EntityState) -> Result;
}

/// Sink that only logs the states, used when there is no Home Assistant to push to.
pub struct LogSink;

#[async_trait]
impl Sink for LogSink {
    async fn publish(&self, state: &EntityState) -> Result {
        info!(entity_id = %state.entity_id, state = %state.state, "sensor");
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Intensity of the current or next period, with the whole series in the attributes.
    Current,

    /// Lowest intensity within the lookahead window.
    Minimum,
}

impl Kind {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Minimum => "minimum",
        }
    }

    const fn friendly_name(self) -> &'static str {
        match self {
            Self::Current => "CO₂ intensity (now/next period)",
            Self::Minimum => "CO₂ minimum (window)",
        }
    }
}

pub struct Sensor {
    kind: Kind,
    instance_id: String,
    unit: Unit,
    updates: watch::Receiver<Update>,
}

impl Sensor {
    pub fn new(kind: Kind, instance_id: &str, unit: Unit, registry: &Registry) -> Result<Self> {
        let updates = registry.get(instance_id)?.subscribe();
        Ok(Self::with_updates(kind, instance_id, unit, updates))
    }

    /// Both sensors of the instance.
    pub fn for_instance(registry: &Registry, instance_id: &str, unit: Unit) -> Result<Vec<Self>> {
        [Kind::Current, Kind::Minimum]
            .into_iter()
            .map(|kind| Self::new(kind, instance_id, unit, registry))
            .collect()
    }

    #[must_use]
    pub fn with_updates(
        kind: Kind,
        instance_id: &str,
        unit: Unit,
        updates: watch::Receiver<Update>,
    ) -> Self {
        Self { kind, instance_id: instance_id.to_owned(), unit, updates }
    }

    #[must_use]
    pub fn entity_id(&self) -> String {
        let slug: String = self
            .instance_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        format!("sensor.ned_co2_{slug}_{}", self.kind.suffix())
    }

    /// Render the latest update.
    #[must_use]
    pub fn state(&self) -> EntityState {
        let update = self.updates.borrow().clone();
        self.render(&update)
    }

    fn render(&self, update: &Update) -> EntityState {
        let mut attributes = Map::from_iter([
            ("unit_of_measurement".to_owned(), json!(self.unit.to_string())),
            ("friendly_name".to_owned(), json!(self.kind.friendly_name())),
            ("icon".to_owned(), json!("mdi:molecule-co2")),
            ("state_class".to_owned(), json!("measurement")),
        ]);

        let Some(snapshot) = &update.snapshot else {
            return EntityState {
                entity_id: self.entity_id(),
                state: State::Unavailable,
                attributes,
            };
        };
        if let Some(error) = &update.last_error {
            attributes.insert("last_error".to_owned(), json!(error.to_string()));
        }

        let record = match self.kind {
            Kind::Current => {
                attributes.insert("points".to_owned(), points(&snapshot.series));
                attributes.insert("count".to_owned(), json!(snapshot.metadata.count));
                attributes
                    .insert("fetched_at".to_owned(), json!(snapshot.metadata.fetched_at_iso()));
                snapshot.current.as_ref()
            }
            Kind::Minimum => {
                if let Some(record) = &snapshot.minimum {
                    attributes.insert("at".to_owned(), local_time(record));
                }
                snapshot.minimum.as_ref()
            }
        };

        EntityState {
            entity_id: self.entity_id(),
            state: record.map_or(State::Unknown, |record| {
                State::Value(self.unit.convert(record.kilograms))
            }),
            attributes,
        }
    }
}

fn points(series: &Series) -> Value {
    series
        .iter()
        .map(|record| {
            json!({ "t": local_time(record), "g_per_kwh": round_to(record.grams.0, 1) })
        })
        .collect()
}

/// Validity start in the local time zone, the raw string when it does not parse.
fn local_time(record: &Record) -> Value {
    match record.valid_from_time() {
        Some(valid_from) => json!(valid_from.with_timezone(&Local).to_rfc3339()),
        None => json!(record.valid_from),
    }
}
