//! Home Assistant REST API, used to publish the sensor states.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{
    prelude::*,
    sensor::{EntityState, Sink},
};

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    /// Base URL is the API root, for example: `http://localhost:8123/api`.
    pub fn new(access_token: &str, base_url: Url) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {access_token}"))?;
        authorization.set_sensitive(true);
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(HeaderMap::from_iter([(AUTHORIZATION, authorization)]))
            .build()?;
        Ok(Self { client, base_url })
    }

    #[instrument(skip_all, fields(entity_id = %state.entity_id))]
    pub async fn set_state(&self, state: &EntityState) -> Result {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .pop_if_empty()
            .push("states")
            .push(&state.entity_id);
        self.client
            .post(url)
            .json(state)
            .send()
            .await
            .context("failed to call Home Assistant")?
            .error_for_status()
            .context("Home Assistant rejected the state")?;
        debug!(state = %state.state, "published");
        Ok(())
    }
}

#[async_trait]
impl Sink for Api {
    async fn publish(&self, state: &EntityState) -> Result {
        self.set_state(state).await
    }
}
