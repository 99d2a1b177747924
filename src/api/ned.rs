//! [Nationaal Energie Dashboard](https://ned.nl) client.

mod query;
mod response;

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{
    Client,
    Response,
    StatusCode,
    Url,
    header::{ACCEPT, HeaderMap, HeaderName, HeaderValue},
    redirect,
};
use tokio::time::sleep;

use self::response::Collection;
pub use self::{
    query::Query,
    response::{ItemId, RawItem},
};
use crate::{
    core::{
        configuration::{ApiKey, Configuration},
        interval::Interval,
    },
    prelude::*,
};

pub const DEFAULT_URL: &str = "https://api.ned.nl/v1/utilizations";

/// Delay before the single retry of a rate-limited request.
pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(5);

const AUTH_TOKEN: HeaderName = HeaderName::from_static("x-auth-token");

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unauthorized or forbidden ({status}), check the API key and access")]
    Auth { status: StatusCode },

    #[error("rate limited, the retry was rate limited too")]
    RateLimited,

    #[error("HTTP error: {status}")]
    Http { status: StatusCode },

    #[error("transport failure")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response body")]
    MalformedBody(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// Shared API client, cheap to clone and safe to use from multiple coordinators.
#[derive(Clone)]
pub struct Api {
    client: Client,
    url: Url,
    rate_limit_delay: Duration,
}

#[bon::bon]
impl Api {
    #[builder]
    pub fn new(
        #[builder(default = Duration::from_secs(30))] timeout: Duration,
        url: Option<Url>,
        #[builder(default = RATE_LIMIT_DELAY)] rate_limit_delay: Duration,
    ) -> Result<Self> {
        let url = match url {
            Some(url) => url,
            None => Url::parse(DEFAULT_URL)?,
        };
        let headers =
            HeaderMap::from_iter([(ACCEPT, HeaderValue::from_static("application/ld+json"))]);
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .default_headers(headers)
            .build()?;
        Ok(Self { client, url, rate_limit_delay })
    }

    /// Fetch the items, retrying once after a rate limit response.
    #[instrument(
        skip_all,
        fields(point = query.point, after = %query.after, before = %query.strictly_before),
    )]
    pub async fn get_utilizations(
        &self,
        api_key: &ApiKey,
        query: &Query,
    ) -> Result<Vec<RawItem>, Error> {
        info!("fetching…");
        let body = self.send(api_key, query).await?.bytes().await?;
        let items = serde_json::from_slice::<Collection>(&body)?.into_items();
        info!(n_items = items.len(), "fetched");
        Ok(items)
    }

    /// Validate the credentials and parameters with a one-hour window starting at `now`.
    ///
    /// Any successful status passes, the body is not read.
    #[instrument(skip_all)]
    pub async fn check(
        &self,
        configuration: &Configuration,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let query = Query::new(configuration, Interval::starting_at(now, TimeDelta::hours(1)));
        self.send(&configuration.api_key, &query).await?;
        Ok(())
    }

    async fn send(&self, api_key: &ApiKey, query: &Query) -> Result<Response, Error> {
        match self.try_send(api_key, query).await {
            Err(Error::RateLimited) => {
                warn!(delay = ?self.rate_limit_delay, "rate limited, retrying once…");
                sleep(self.rate_limit_delay).await;
                self.try_send(api_key, query).await
            }
            result => result,
        }
    }

    async fn try_send(&self, api_key: &ApiKey, query: &Query) -> Result<Response, Error> {
        let mut token = HeaderValue::from_str(api_key.expose())
            .map_err(|_| Error::Auth { status: StatusCode::UNAUTHORIZED })?;
        token.set_sensitive(true);

        let response =
            self.client.get(self.url.clone()).header(AUTH_TOKEN, token).query(query).send().await?;
        match response.status() {
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(Error::Auth { status })
            }
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited),
            status if !status.is_success() => Err(Error::Http { status }),
            _ => Ok(response),
        }
    }
}
