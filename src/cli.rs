mod check;
mod heartbeat;
mod home_assistant;
mod ned;
mod scout;
mod watch;

use clap::{Parser, Subcommand};

pub use self::{check::CheckArgs, scout::ScoutArgs, watch::WatchArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: poll the dashboard and publish the sensors until interrupted.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Validate the API key and the parameters with a one-hour request.
    #[clap(name = "check")]
    Check(Box<CheckArgs>),

    /// Fetch the series once and print it.
    #[clap(name = "scout")]
    Scout(Box<ScoutArgs>),
}

impl Command {
    pub async fn run(self) -> crate::prelude::Result {
        match self {
            Self::Watch(args) => args.run().await,
            Self::Check(args) => args.run().await,
            Self::Scout(args) => args.run().await,
        }
    }
}
