//! `fleetdesk-snapshot`: print the triage list as HTML.
//!
//! Optional first argument is a search query applied before rendering.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use fleetdesk_client::FleetClient;
use fleetdesk_dashboard::{DashboardConfig, TriageAction, TriagePage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fleetdesk_observability::init();

    let config = DashboardConfig::from_env().context("invalid configuration")?;
    let client = FleetClient::new(&config.client).context("failed to build HTTP client")?;
    tracing::info!(api_url = %client.api_url(), "fetching triage snapshot");

    let mut page = TriagePage::new(Arc::new(client), config.overdue_policy());
    page.load().await;

    let now = Utc::now();
    if let Some(query) = std::env::args().nth(1) {
        page.dispatch(TriageAction::SetSearch(query), now).await;
    }
    println!("{}", page.render(now));

    if page.view().snapshot.is_failed() {
        anyhow::bail!("triage snapshot could not be loaded");
    }
    Ok(())
}
