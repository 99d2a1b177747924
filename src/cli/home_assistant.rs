use clap::Parser;
use reqwest::Url;

use crate::{
    api::home_assistant,
    prelude::*,
    sensor::{LogSink, Sink},
};

#[derive(Parser)]
pub struct HomeAssistantArgs {
    /// Home Assistant API base URL. For example: `http://localhost:8123/api`.
    ///
    /// The sensor states are only logged when omitted.
    #[clap(
        long = "home-assistant-api-base-url",
        env = "HOME_ASSISTANT_API_BASE_URL",
        requires = "access_token"
    )]
    pub base_url: Option<Url>,

    /// Home Assistant API access token.
    #[clap(
        long = "home-assistant-access-token",
        env = "HOME_ASSISTANT_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub access_token: Option<String>,
}

impl HomeAssistantArgs {
    pub fn sink(&self) -> Result<Box<dyn Sink>> {
        match (&self.base_url, &self.access_token) {
            (Some(base_url), Some(access_token)) => {
                Ok(Box::new(home_assistant::Api::new(access_token, base_url.clone())?))
            }
            (None, _) => {
                info!("no Home Assistant URL, the sensors will only be logged");
                Ok(Box::new(LogSink))
            }
            (Some(_), None) => bail!("the Home Assistant access token is required"),
        }
    }
}
