use std::future::{Future, pending};

use clap::Parser;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{select, signal::ctrl_c};

use crate::{
    cli::{heartbeat::HeartbeatArgs, home_assistant::HomeAssistantArgs, ned::NedArgs},
    coordinator::{Coordinator, Registry},
    prelude::*,
    sensor::{Publisher, Sensor},
};

#[derive(Parser)]
pub struct WatchArgs {
    /// Identifier of the instance, used in the sensor entity identifiers.
    #[clap(long = "instance-id", env = "INSTANCE_ID", default_value = "default")]
    instance_id: String,

    #[clap(flatten)]
    ned: NedArgs,

    #[clap(flatten)]
    home_assistant: HomeAssistantArgs,

    #[clap(flatten)]
    heartbeat: HeartbeatArgs,
}

impl WatchArgs {
    #[instrument(skip_all, fields(instance_id = %self.instance_id))]
    pub async fn run(self) -> Result {
        let configuration = self.ned.configuration()?;
        let unit = configuration.unit;
        let (coordinator, handle) = Coordinator::new(self.ned.api()?, configuration);

        let mut registry = Registry::default();
        registry.insert(self.instance_id.as_str(), handle.clone())?;
        let publisher = Publisher::builder()
            .sensors(Sensor::for_instance(&registry, &self.instance_id, unit)?)
            .sink(self.home_assistant.sink()?)
            .heartbeat(self.heartbeat.client()?)
            .updates(handle.subscribe())
            .build();

        let shutdown = shutdown_signal()?;
        tokio::join!(
            coordinator.run(shutdown),
            publisher.run(),
            control(&registry, &self.instance_id, &self.ned),
        );
        registry.remove(&self.instance_id);
        Ok(())
    }
}

/// Refresh all the instances on `SIGUSR1`, reload the configuration on `SIGHUP`.
///
/// Returns when the instance stops.
#[cfg(unix)]
async fn control(registry: &Registry, instance_id: &str, running: &NedArgs) {
    let Ok(handle) = registry.get(instance_id) else {
        return;
    };
    let (mut user_defined, mut hangup) =
        match (signal(SignalKind::user_defined1()), signal(SignalKind::hangup())) {
            (Ok(user_defined), Ok(hangup)) => (user_defined, hangup),
            (Err(error), _) | (_, Err(error)) => {
                warn!("failed to listen for the control signals: {error:#}");
                handle.stopped().await;
                return;
            }
        };
    loop {
        select! {
            () = handle.stopped() => break,
            Some(()) = user_defined.recv() => {
                for (instance_id, handle) in registry.iter() {
                    if let Err(error) = handle.refresh().await {
                        warn!(instance_id, "failed to request the refresh: {error:#}");
                    }
                }
            }
            Some(()) = hangup.recv() => {
                if let Err(error) = reload(handle, running).await {
                    warn!("failed to reload the configuration: {error:#}");
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn control(registry: &Registry, instance_id: &str, _running: &NedArgs) {
    if let Ok(handle) = registry.get(instance_id) {
        handle.stopped().await;
    }
}

/// Re-read the `.env` file and the command line, and reconfigure the coordinator.
///
/// Only the request parameters and the poll interval are applied, other changes are reported.
#[cfg(unix)]
async fn reload(handle: &crate::coordinator::Handle, running: &NedArgs) -> Result {
    use crate::cli::{Args, Command};

    info!("reloading…");
    let _ = dotenvy::dotenv_override();
    let Command::Watch(args) = Args::try_parse()?.command else {
        bail!("the process is not watching");
    };
    for option in running.ignored_on_reload(&args.ned) {
        warn!(option, "changed, restart to apply");
    }
    handle.reconfigure(args.ned.configuration()?).await
}

/// Resolves on Ctrl+C or, on Unix, `SIGTERM`.
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    #[cfg(unix)]
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        let interrupt = async {
            if let Err(error) = ctrl_c().await {
                error!("failed to listen for Ctrl+C: {error:#}");
                pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            terminate.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = pending::<()>();

        select! {
            () = interrupt => {},
            () = terminate => {},
        }
        info!("shutting down…");
    })
}
