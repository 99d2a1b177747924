use std::time::Duration;

use reqwest::{Client as HttpClient, Url};

use crate::prelude::*;

/// Optional dead man's switch pinged after every successful update.
#[derive(Clone)]
pub struct Client {
    inner: HttpClient,
    url: Option<Url>,
}

impl Client {
    pub fn new(url: Option<Url>) -> Result<Self> {
        let inner = HttpClient::builder().timeout(Duration::from_secs(3)).build()?;
        Ok(Self { inner, url })
    }

    pub async fn send(&self) {
        if let Some(url) = &self.url
            && let Err(error) = self.send_fallible(url.clone()).await
        {
            warn!("failed to send the heartbeat: {error:#}");
        }
    }

    #[instrument(skip_all)]
    async fn send_fallible(&self, url: Url) -> Result {
        debug!("sending a heartbeat…");
        self.inner.post(url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;

    #[tokio::test]
    async fn test_send_ok() -> Result {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/ping").with_status(200).create_async().await;
        Client::new(Some(Url::parse(&format!("{}/ping", server.url()))?))?.send().await;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() -> Result {
        let mut server = Server::new_async().await;
        let mock = server.mock("POST", "/ping").with_status(500).create_async().await;
        Client::new(Some(Url::parse(&format!("{}/ping", server.url()))?))?.send().await;
        mock.assert_async().await;
        Ok(())
    }
}
