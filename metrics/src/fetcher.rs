use crate::{
    exposition,
    snapshot::MetricsSnapshot,
};
use eyre::Result;
use reqwest::Client;
use url::Url;

/// Fetch and parse the metrics endpoint.
///
/// Missing metrics are not fatal for a dashboard: a transport error, a non-success status or a malformed
/// payload is logged and yields an empty snapshot, so every aggregate comes out zeroed or absent.
pub async fn fetch_snapshot(client: &Client, url: &Url) -> MetricsSnapshot {
    match try_fetch_snapshot(client, url).await {
        Ok(snapshot) => {
            debug!(%url, families = snapshot.len(), "fetched metrics");
            snapshot
        }
        Err(err) => {
            warn!(%url, "failed to fetch metrics, continuing with an empty snapshot: {err}");
            MetricsSnapshot::empty()
        }
    }
}

/// Like [`fetch_snapshot`] but surfaces the failure.
pub async fn try_fetch_snapshot(client: &Client, url: &Url) -> Result<MetricsSnapshot> {
    let body = client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    exposition::parse(&body)
}
