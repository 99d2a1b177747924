use clap::Parser;

use crate::{
    cli::ned::NedArgs,
    coordinator::Coordinator,
    prelude::*,
    sensor::{Kind, Sensor},
    tables::build_series_table,
};

#[derive(Parser)]
pub struct ScoutArgs {
    /// Print the normalised series as JSON instead of the table.
    #[clap(long)]
    json: bool,

    #[clap(flatten)]
    ned: NedArgs,
}

impl ScoutArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let configuration = self.ned.configuration()?;
        let unit = configuration.unit;
        let (coordinator, handle) = Coordinator::new(self.ned.api()?, configuration);
        coordinator.refresh().await;
        let update = handle.latest();
        if let Some(error) = update.last_error {
            return Err(anyhow!(error));
        }
        let snapshot = update.snapshot.context("no snapshot has been produced")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&*snapshot.series)?);
            return Ok(());
        }
        println!("{}", build_series_table(&snapshot));
        info!(query = ?snapshot.metadata.query, "fetched with");

        for kind in [Kind::Current, Kind::Minimum] {
            let state = Sensor::with_updates(kind, "scout", unit, handle.subscribe()).state();
            info!(entity_id = %state.entity_id, state = %state.state, "sensor");
        }
        Ok(())
    }
}
