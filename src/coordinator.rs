//! Polling coordinator: fetches, normalises, and publishes the snapshot.

mod registry;

use std::{future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{
    pin,
    select,
    sync::{mpsc, watch},
    time::{Instant, Interval, MissedTickBehavior, interval_at},
};

pub use self::registry::Registry;
use crate::{
    api::ned,
    core::{configuration::Configuration, series::Series, snapshot::Snapshot},
    prelude::*,
};

/// What the subscribers see.
#[derive(Clone, Default)]
pub struct Update {
    /// Latest successful snapshot, `None` until the first successful cycle.
    pub snapshot: Option<Arc<Snapshot>>,

    /// Failure of the most recent cycle, cleared by a successful one.
    pub last_error: Option<Arc<ned::Error>>,
}

impl Update {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.snapshot.is_some()
    }
}

enum Command {
    Refresh,
    Reconfigure(Box<Configuration>),
}

/// Cloneable handle to a running coordinator.
#[derive(Clone)]
pub struct Handle {
    updates: watch::Receiver<Update>,
    commands: mpsc::Sender<Command>,
}

impl Handle {
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Update> {
        self.updates.clone()
    }

    #[must_use]
    pub fn latest(&self) -> Update {
        self.updates.borrow().clone()
    }

    /// Request an out-of-schedule cycle.
    pub async fn refresh(&self) -> Result {
        self.send(Command::Refresh).await
    }

    /// Replace the configuration, applied between cycles and followed by an immediate cycle.
    pub async fn reconfigure(&self, configuration: Configuration) -> Result {
        self.send(Command::Reconfigure(Box::new(configuration.validate()?))).await
    }

    /// Resolves when the coordinator stops.
    pub async fn stopped(&self) {
        self.commands.closed().await;
    }

    async fn send(&self, command: Command) -> Result {
        self.commands.send(command).await.map_err(|_| anyhow!("the coordinator has stopped"))
    }
}

pub struct Coordinator {
    api: ned::Api,
    configuration: Configuration,
    updates: watch::Sender<Update>,
    commands: mpsc::Receiver<Command>,
}

impl Coordinator {
    pub fn new(api: ned::Api, configuration: Configuration) -> (Self, Handle) {
        let (updates_sender, updates) = watch::channel(Update::default());
        let (commands_sender, commands) = mpsc::channel(4);
        let coordinator = Self { api, configuration, updates: updates_sender, commands };
        (coordinator, Handle { updates, commands: commands_sender })
    }

    /// Run the cycles until `shutdown` resolves.
    ///
    /// The first cycle starts immediately. A cycle in flight is abandoned on shutdown,
    /// which leaves the last published snapshot intact.
    #[instrument(skip_all, fields(point = self.configuration.point))]
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        pin!(shutdown);
        let mut interval = new_interval(Instant::now(), self.configuration.poll_interval());
        info!(period = ?self.configuration.poll_interval(), "running…");

        loop {
            select! {
                biased;

                () = &mut shutdown => break,

                _ = interval.tick() => {}

                Some(command) = self.commands.recv() => match command {
                    Command::Refresh => {
                        info!("refresh requested");
                    }
                    Command::Reconfigure(configuration) => {
                        info!("reconfiguring…");
                        self.configuration = *configuration;
                        let period = self.configuration.poll_interval();
                        interval = new_interval(Instant::now() + period, period);
                    }
                },
            }

            select! {
                biased;

                () = &mut shutdown => {
                    warn!("shutting down, the fetch in flight is abandoned");
                    break;
                }

                () = self.refresh() => {}
            }
        }

        info!("stopped");
    }

    /// Run a single cycle and publish its outcome.
    pub async fn refresh(&self) {
        let now = Utc::now();
        match self.poll(now).await {
            Ok(snapshot) => {
                info!(
                    count = snapshot.metadata.count,
                    current = ?snapshot.current.as_ref().map(|record| record.grams),
                    minimum = ?snapshot.minimum.as_ref().map(|record| record.grams),
                    "updated"
                );
                let snapshot = Arc::new(snapshot);
                self.updates.send_modify(|update| {
                    update.snapshot = Some(snapshot);
                    update.last_error = None;
                });
            }
            Err(error) => {
                warn!(?error, "update failed, keeping the previous snapshot");
                self.updates.send_modify(|update| {
                    update.last_error = Some(Arc::new(error));
                });
            }
        }
    }

    /// Fetch and normalise the series for the window starting at `now`, without publishing.
    pub async fn poll(&self, now: DateTime<Utc>) -> Result<Snapshot, ned::Error> {
        let window = self.configuration.window(now);
        debug!(?window, "polling…");
        let query = ned::Query::new(&self.configuration, window);
        let items = self.api.get_utilizations(&self.configuration.api_key, &query).await?;
        Ok(Snapshot::new(items.into_iter().collect::<Series>(), query, now))
    }
}

fn new_interval(start: Instant, period: Duration) -> Interval {
    let mut interval = interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
