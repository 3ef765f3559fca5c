use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Url};
use tokio::fs;
use tracing::{debug, warn};

const MAPQUEST_ENDPOINT: &str = "https://www.mapquestapi.com/staticmap/v5/map";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches and caches static map images for cafes.
///
/// The image for a cafe lives at `{static_dir}/maps/{cafe_id}.jpg`, so a
/// later fetch for the same cafe overwrites the prior image. Fetch failures
/// are logged and swallowed: a missing or stale map never fails the cafe
/// write that triggered it.
#[derive(Clone, Debug)]
pub struct MapClient {
    http: Client,
    api_key: Option<String>,
    static_dir: PathBuf,
}

impl MapClient {
    pub fn new(api_key: Option<String>, static_dir: PathBuf) -> Result<Self> {
        let http = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key,
            static_dir,
        })
    }

    /// Root directory for static assets, including cached map images.
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Deterministic lookup URL for a cafe's location.
    pub fn lookup_url(key: &str, address: &str, city: &str, state: &str) -> Result<Url> {
        let center = format!("{address}, {city}, {state}");
        let url = Url::parse_with_params(
            MAPQUEST_ENDPOINT,
            &[
                ("key", key),
                ("center", center.as_str()),
                ("size", "600,400"),
                ("zoom", "15"),
            ],
        )?;
        Ok(url)
    }

    /// Where the cached map image for a cafe lives on disk.
    pub fn image_path(&self, cafe_id: i32) -> PathBuf {
        self.static_dir.join("maps").join(format!("{cafe_id}.jpg"))
    }

    /// Fetch the map image for a cafe's address and store it keyed by the
    /// cafe's id. Skipped when no API key is configured.
    pub async fn refresh(&self, cafe_id: i32, address: &str, city: &str, state: &str) -> Result<()> {
        let Some(key) = &self.api_key else {
            debug!("no map API key configured, skipping map fetch for cafe {cafe_id}");
            return Ok(());
        };

        let url = Self::lookup_url(key, address, city, state)?;
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let path = self.image_path(cafe_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &bytes).await?;

        debug!("cached map image for cafe {cafe_id} at {}", path.display());
        Ok(())
    }

    /// Spawn a detached refresh so the triggering request never waits on the
    /// map service. Failures are logged at warn and dropped.
    pub fn spawn_refresh(&self, cafe_id: i32, address: String, city: String, state: String) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.refresh(cafe_id, &address, &city, &state).await {
                warn!("map fetch for cafe {cafe_id} failed: {e}");
            }
        });
    }
}
