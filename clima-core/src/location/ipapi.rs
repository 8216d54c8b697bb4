use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{LocationFix, LocationProvider, LocationSink};

pub const DEFAULT_LOCATION_URL: &str = "http://ip-api.com/json";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// IP geolocation is city-level at best.
const IP_ACCURACY_M: f64 = 5000.0;

/// Approximate location from the public IP address.
#[derive(Debug)]
pub struct IpLocationProvider {
    url: String,
    http: Client,
    task: Option<JoinHandle<()>>,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocationProvider {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            url: url.into(),
            http,
            task: None,
        })
    }

    async fn lookup(http: &Client, url: &str) -> Result<LocationFix, String> {
        let res = http
            .get(url)
            .send()
            .await
            .map_err(|e| format!("IP geolocation request failed: {e}"))?;

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| format!("IP geolocation response unreadable: {e}"))?;

        if body.status != "success" {
            return Err(body
                .message
                .unwrap_or_else(|| format!("IP geolocation status '{}'", body.status)));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(LocationFix::new(lat, lon, IP_ACCURACY_M)),
            _ => Err("IP geolocation response has no coordinates".to_string()),
        }
    }
}

impl LocationProvider for IpLocationProvider {
    fn start_updates(&mut self, sink: LocationSink) {
        self.stop_updates();

        let http = self.http.clone();
        let url = self.url.clone();

        self.task = Some(tokio::spawn(async move {
            match Self::lookup(&http, &url).await {
                Ok(fix) => {
                    tracing::info!(lat = fix.latitude, lon = fix.longitude, "located by IP");
                    sink.update(vec![fix]);
                }
                Err(reason) => {
                    tracing::warn!("{reason}");
                    sink.fail(reason);
                }
            }
        }));
    }

    fn stop_updates(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for IpLocationProvider {
    fn drop(&mut self) {
        self.stop_updates();
    }
}
