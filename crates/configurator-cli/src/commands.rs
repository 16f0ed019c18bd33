//! `show` and `fetch` command implementations.

use crate::{summary::Summary, OutputArgs};
use anyhow::{bail, Context, Result};
use configurator_catalog::SnapshotLoader;
use configurator_client::HttpDataStore;
use configurator_core::{AppConfig, CategoryId, ConfiguratorId, OptionId};
use configurator_engine::{DataStore, MemoryStore, Session};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Parse a `CATEGORY=OPTION` argument. `CATEGORY=` deselects the category.
pub fn parse_selection(raw: &str) -> Result<(CategoryId, Option<OptionId>)> {
    let Some((category, option)) = raw.split_once('=') else {
        bail!("invalid selection '{raw}': expected CATEGORY=OPTION");
    };
    let category_id = CategoryId::new(category.trim())
        .with_context(|| format!("invalid category in '{raw}'"))?;

    let option = option.trim();
    if option.is_empty() {
        return Ok((category_id, None));
    }
    let option_id = OptionId::new(option).with_context(|| format!("invalid option in '{raw}'"))?;
    Ok((category_id, Some(option_id)))
}

/// Load a configurator from a snapshot file.
pub async fn show(config: &AppConfig, snapshot: &Path, output: &OutputArgs) -> Result<String> {
    let snapshot = SnapshotLoader::new(snapshot)
        .and_then(|loader| loader.load())
        .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
    let public_id = snapshot.public_id.clone();

    let store = MemoryStore::with_snapshot(snapshot);
    run_session(config, Arc::new(store), &public_id, output).await
}

/// Load a configurator from the API.
pub async fn fetch(
    config: &AppConfig,
    public_id: &str,
    api_url: Option<String>,
    output: &OutputArgs,
) -> Result<String> {
    let public_id = ConfiguratorId::new(public_id).context("invalid public ID")?;

    let mut api = config.api.clone();
    if let Some(url) = api_url {
        api.base_url = url;
    }
    let store = HttpDataStore::from_config(&api).context("creating API client")?;
    info!(base_url = store.base_url(), "fetching configurator");

    run_session(config, Arc::new(store), &public_id, output).await
}

async fn run_session(
    config: &AppConfig,
    store: Arc<dyn DataStore>,
    public_id: &ConfiguratorId,
    output: &OutputArgs,
) -> Result<String> {
    let selections = output
        .selections
        .iter()
        .map(|raw| parse_selection(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut session = Session::new(store, &config.session);
    let mut cleared = session
        .load(public_id)
        .await
        .with_context(|| format!("loading configurator {public_id}"))?;

    for (category_id, option_id) in selections {
        if let Some(option_id) = option_id {
            debug!(category_id = %category_id, option_id = %option_id, "applying selection");
            let step = session
                .select_option(category_id, option_id)
                .context("applying selection")?;
            cleared.extend(step);
        } else {
            debug!(category_id = %category_id, "clearing selection");
            session
                .clear_selection(category_id)
                .context("clearing selection")?;
        }
    }

    if output.quote {
        let snapshot = session.quote_snapshot()?;
        return Ok(serde_json::to_string_pretty(&snapshot)?);
    }

    let summary = Summary::from_session(&session, cleared, &config.display);
    if output.json {
        Ok(serde_json::to_string_pretty(&summary)?)
    } else {
        Ok(summary.render_text())
    }
}
