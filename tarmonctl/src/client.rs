//! HTTP client for the receiver endpoint.
//!
//! One blocking GET per cycle, nothing fancier.  Authentication does not
//! apply, the feed is an unauthenticated LAN endpoint.
//!

use std::time::Duration;

use clap::{crate_name, crate_version};
use eyre::{eyre, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::StatusCode;
use tracing::{debug, trace};

use tarmon_formats::Snapshot;

/// Request timeout, the receiver is expected on the LAN
const TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking client for one receiver endpoint.
///
#[derive(Clone, Debug)]
pub struct Client {
    /// Endpoint url taken from config
    url: String,
    /// reqwest blocking client
    client: HttpClient,
}

impl Client {
    #[tracing::instrument]
    pub fn new(url: &str) -> Result<Self> {
        trace!("client::new");

        let client = HttpClient::builder().timeout(TIMEOUT).build()?;
        Ok(Client {
            url: url.to_owned(),
            client,
        })
    }

    /// Fetch one snapshot.
    ///
    #[tracing::instrument(skip(self))]
    pub fn fetch(&self) -> Result<Snapshot> {
        trace!("Fetching data from {}…", self.url);

        let resp = self
            .client
            .get(&self.url)
            .header(
                "user-agent",
                format!("{}/{}", crate_name!(), crate_version!()),
            )
            .send()?;

        // Check status
        //
        match resp.status() {
            StatusCode::OK => {
                trace!("OK");
            }
            code => {
                let h = &resp.headers();
                return Err(eyre!("Error({}): {:?}", code, h));
            }
        }

        let snapshot: Snapshot = resp.json()?;
        debug!("{:?}", snapshot);
        Ok(snapshot)
    }

    /// Check the endpoint answers with a compatible feed, i.e. the payload
    /// carries the `aircraft` key.
    ///
    #[tracing::instrument(skip(self))]
    pub fn probe(&self) -> Result<()> {
        trace!("client::probe");

        let snapshot = self.fetch()?;
        if snapshot.aircraft.is_none() {
            return Err(eyre!(
                "connection to {} established but the data is not compatible",
                self.url
            ));
        }
        Ok(())
    }
}
