use bon::Builder;
use tokio::sync::watch;

use crate::{
    api::heartbeat,
    coordinator::Update,
    prelude::*,
    sensor::{Sensor, Sink},
};

/// Pushes the sensor states to the sink on every coordinator update.
#[derive(Builder)]
pub struct Publisher {
    sensors: Vec<Sensor>,
    sink: Box<dyn Sink>,
    heartbeat: heartbeat::Client,

    /// Trigger, normally the same coordinator the sensors subscribe to.
    updates: watch::Receiver<Update>,
}

impl Publisher {
    /// Run until the coordinator stops.
    pub async fn run(mut self) {
        while self.updates.changed().await.is_ok() {
            let (is_available, is_healthy) = {
                let update = self.updates.borrow_and_update();
                (update.is_available(), update.last_error.is_none())
            };
            if !is_available {
                warn!("no data yet, the sensors are unavailable");
            }
            self.publish().await;
            if is_healthy {
                self.heartbeat.send().await;
            }
        }
        debug!("the coordinator has stopped");
    }

    /// Publish all the sensors, a failing one does not block the rest.
    pub async fn publish(&self) {
        for sensor in &self.sensors {
            let state = sensor.state();
            if let Err(error) = self.sink.publish(&state).await {
                warn!(entity_id = %state.entity_id, "failed to publish: {error:#}");
            }
        }
    }
}
