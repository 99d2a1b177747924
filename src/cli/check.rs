use chrono::Utc;
use clap::Parser;

use crate::{api::ned, cli::ned::NedArgs, prelude::*};

#[derive(Parser)]
pub struct CheckArgs {
    #[clap(flatten)]
    ned: NedArgs,
}

impl CheckArgs {
    pub async fn run(self) -> Result {
        match self.check().await {
            Ok(()) => {
                println!("ok");
                Ok(())
            }
            Err(error) => {
                let verdict = Verdict::from(&error);
                println!("{verdict}");
                Err(error.context(verdict))
            }
        }
    }

    #[instrument(skip_all)]
    async fn check(&self) -> Result {
        let configuration = self.ned.configuration()?;
        info!("checking…");
        Ok(self.ned.api()?.check(&configuration, Utc::now()).await?)
    }
}

/// User-facing outcome of a failed check.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum Verdict {
    #[display("invalid credentials")]
    InvalidCredentials,

    #[display("cannot connect")]
    CannotConnect,

    #[display("unknown error")]
    Unknown,
}

impl From<&Error> for Verdict {
    fn from(error: &Error) -> Self {
        match error.downcast_ref::<ned::Error>() {
            Some(error) if error.is_auth() => Self::InvalidCredentials,
            Some(_) => Self::CannotConnect,
            None => Self::Unknown,
        }
    }
}
