use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::{
    api::ned,
    core::{
        configuration::{Classification, Configuration, Granularity},
        unit::Unit,
    },
    prelude::*,
};

#[derive(Parser)]
pub struct NedArgs {
    /// Nationaal Energie Dashboard API key.
    #[clap(long = "ned-api-key", env = "NED_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Location point, `0` is the whole Netherlands.
    #[clap(long, env = "NED_POINT", default_value = "0")]
    point: u32,

    /// Product type, `27` is the electricity mix.
    #[clap(long = "type", env = "NED_TYPE", default_value = "27")]
    product_type: u32,

    /// Activity, `1` is the CO₂ emission factor.
    #[clap(long, env = "NED_ACTIVITY", default_value = "1")]
    activity: u32,

    #[clap(long, env = "NED_CLASSIFICATION", default_value = "forecast")]
    classification: Classification,

    #[clap(long, env = "NED_GRANULARITY", default_value = "hour")]
    granularity: Granularity,

    /// Granularity time zone, `1` is CET.
    #[clap(
        long = "granularity-time-zone",
        env = "NED_GRANULARITY_TIME_ZONE",
        default_value = "1"
    )]
    granularity_time_zone: u32,

    #[clap(
        long = "lookahead-hours",
        env = "LOOKAHEAD_HOURS",
        default_value = "24",
        value_parser = clap::value_parser!(u32).range(1..=168),
    )]
    lookahead_hours: u32,

    #[clap(
        long = "poll-interval-minutes",
        env = "POLL_INTERVAL_MINUTES",
        default_value = "30",
        value_parser = clap::value_parser!(u32).range(5..=1440),
    )]
    poll_interval_minutes: u32,

    /// Display unit of the sensors.
    #[clap(long, env = "UNIT", default_value = "g_per_kwh")]
    unit: Unit,

    /// Timeout of a single API request, must be shorter than the poll interval.
    #[clap(long = "request-timeout", env = "REQUEST_TIMEOUT", default_value = "30s")]
    request_timeout: humantime::Duration,

    /// Override the API endpoint.
    #[clap(long = "ned-api-url", env = "NED_API_URL")]
    url: Option<Url>,
}

impl NedArgs {
    pub fn configuration(&self) -> Result<Configuration> {
        Configuration::builder()
            .api_key(self.api_key.as_str())
            .point(self.point)
            .product_type(self.product_type)
            .activity(self.activity)
            .classification(self.classification)
            .granularity(self.granularity)
            .granularity_time_zone(self.granularity_time_zone)
            .lookahead_hours(self.lookahead_hours)
            .poll_interval_minutes(self.poll_interval_minutes)
            .unit(self.unit)
            .build()
            .validate()
    }

    pub fn api(&self) -> Result<ned::Api> {
        let timeout: Duration = self.request_timeout.into();
        let poll_interval = Duration::from_secs(u64::from(self.poll_interval_minutes) * 60);
        ensure!(
            timeout < poll_interval,
            "the request timeout ({}) must be shorter than the poll interval",
            self.request_timeout,
        );
        ned::Api::builder().timeout(timeout).maybe_url(self.url.clone()).build()
    }

    /// Names of the changed options that a running instance cannot apply.
    ///
    /// The client and the sensors are built once, so these need a restart.
    #[must_use]
    pub fn ignored_on_reload(&self, reloaded: &Self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.unit != reloaded.unit {
            ignored.push("unit");
        }
        if self.request_timeout != reloaded.request_timeout {
            ignored.push("request timeout");
        }
        if self.url != reloaded.url {
            ignored.push("API URL");
        }
        ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct Args {
        #[clap(flatten)]
        ned: NedArgs,
    }

    fn parse(args: &[&str]) -> Result<NedArgs> {
        let args = ["ned-co2", "--ned-api-key", "secret"].iter().chain(args);
        Ok(Args::try_parse_from(args)?.ned)
    }

    #[test]
    fn test_defaults() -> Result {
        let args = parse(&[])?;
        let configuration = args.configuration()?;
        assert_eq!(configuration.classification, Classification::Forecast);
        assert_eq!(configuration.granularity, Granularity::Hour);
        assert_eq!(configuration.lookahead_hours, 24);
        assert_eq!(configuration.poll_interval_minutes, 30);
        assert!(args.api().is_ok());
        Ok(())
    }

    #[test]
    fn test_numeric_aliases() -> Result {
        let args = parse(&["--classification", "2", "--granularity", "4"])?;
        let configuration = args.configuration()?;
        assert_eq!(configuration.classification, Classification::Actual);
        assert_eq!(configuration.granularity, Granularity::QuarterHour);
        Ok(())
    }

    #[test]
    fn test_out_of_range() {
        assert!(parse(&["--lookahead-hours", "0"]).is_err());
        assert!(parse(&["--lookahead-hours", "169"]).is_err());
        assert!(parse(&["--poll-interval-minutes", "4"]).is_err());
        assert!(parse(&["--classification", "7"]).is_err());
        assert!(parse(&["--granularity", "3"]).is_err());
    }

    #[test]
    fn test_timeout_must_be_shorter_than_interval() -> Result {
        let args = parse(&["--poll-interval-minutes", "5", "--request-timeout", "5m"])?;
        assert!(args.api().is_err());
        Ok(())
    }

    #[test]
    fn test_ignored_on_reload() -> Result {
        let running = parse(&[])?;
        let reloaded = parse(&["--point", "42", "--poll-interval-minutes", "60"])?;
        assert!(running.ignored_on_reload(&reloaded).is_empty());

        let reloaded = parse(&[
            "--unit",
            "kg_per_kwh",
            "--request-timeout",
            "1m",
            "--ned-api-url",
            "http://localhost/v1/utilizations",
        ])?;
        assert_eq!(running.ignored_on_reload(&reloaded), ["unit", "request timeout", "API URL"]);
        Ok(())
    }
}
