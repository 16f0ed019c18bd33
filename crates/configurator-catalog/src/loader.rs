//! Configurator snapshot loading.
//!
//! A snapshot is the configurator payload served by the data store: metadata,
//! the category/option tree and the incompatibility list. Snapshots can also
//! be read from JSON or TOML files, which is how fixtures and offline
//! sessions are fed.

use crate::{
    catalog::Catalog,
    definition::Category,
    error::{CatalogError, Result},
    incompatibility::{Incompatibility, IncompatibilityIndex},
};
use configurator_core::{ConfiguratorId, Sku};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn default_true() -> bool {
    true
}

/// Configurator payload as served by the data store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguratorSnapshot {
    /// Internal record ID, if the store exposes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Public identifier (API key) used to fetch the configurator
    pub public_id: ConfiguratorId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// ISO currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Currency symbol for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,

    /// Whether the configurator is active
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Whether the configurator is published
    #[serde(default)]
    pub is_published: bool,

    /// Category tree
    #[serde(default)]
    pub categories: Vec<Category>,

    /// Incompatibility rules
    #[serde(default)]
    pub incompatibilities: Vec<IncompatibilityEntry>,
}

/// Incompatibility rule as it appears on the wire; sides may be blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncompatibilityEntry {
    /// One side of the pair
    #[serde(default)]
    pub from: Option<String>,
    /// The other side of the pair
    #[serde(default)]
    pub to: Option<String>,
}

impl IncompatibilityEntry {
    fn into_rule(self) -> Option<Incompatibility> {
        let from = Sku::new(self.from?).ok()?;
        let to = Sku::new(self.to?).ok()?;
        Some(Incompatibility::new(from, to))
    }
}

/// Configurator metadata kept alongside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguratorInfo {
    /// Public identifier
    pub public_id: ConfiguratorId,
    /// Display name
    pub name: String,
    /// ISO currency code, if the store provided one
    pub currency: Option<String>,
    /// Currency symbol, if the store provided one
    pub currency_symbol: Option<String>,
}

/// A snapshot split into the pieces a session owns.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    /// Configurator metadata
    pub info: ConfiguratorInfo,
    /// Validated catalog of active categories and options
    pub catalog: Catalog,
    /// Incompatibility relation
    pub rules: IncompatibilityIndex,
}

impl ConfiguratorSnapshot {
    /// Split the snapshot into metadata, catalog and rules.
    ///
    /// Soft-deleted (inactive) categories and options are dropped. Bad
    /// options are repaired per option (see [`Category::normalize`]) so one
    /// bad record does not hide the rest of its category. Duplicate
    /// categories and rules with a blank side are logged and skipped.
    #[must_use]
    pub fn into_loaded(self) -> LoadedCatalog {
        let mut catalog = Catalog::new();
        let mut seen = HashSet::new();

        for mut category in self.categories {
            if !category.is_active {
                debug!(category_id = %category.id, "skipping inactive category");
                continue;
            }
            if !seen.insert(category.id.clone()) {
                warn!(category_id = %category.id, "skipping duplicate category");
                continue;
            }
            category.options.retain(|opt| opt.is_active);
            let repairs = category.normalize();
            if repairs > 0 {
                debug!(category_id = %category.id, repairs, "repaired category");
            }

            let category_id = category.id.clone();
            if let Err(e) = catalog.add_category(category) {
                warn!(category_id = %category_id, error = %e, "skipping invalid category");
            }
        }

        let total_rules = self.incompatibilities.len();
        let rules: Vec<Incompatibility> = self
            .incompatibilities
            .into_iter()
            .filter_map(IncompatibilityEntry::into_rule)
            .collect();
        if rules.len() < total_rules {
            warn!(
                skipped = total_rules - rules.len(),
                "skipping incompatibility rules with blank SKUs"
            );
        }

        info!(
            public_id = %self.public_id,
            categories = catalog.len(),
            rules = rules.len(),
            "loaded configurator snapshot"
        );

        LoadedCatalog {
            info: ConfiguratorInfo {
                public_id: self.public_id,
                name: self.name,
                currency: self.currency,
                currency_symbol: self.currency_symbol,
            },
            catalog,
            rules: IncompatibilityIndex::from_rules(rules),
        }
    }
}

/// Loader for configurator snapshots stored as files.
pub struct SnapshotLoader {
    /// Snapshot file (`.json` or `.toml`)
    path: PathBuf,
}

impl SnapshotLoader {
    /// Create a loader for the given file.
    ///
    /// # Errors
    /// Returns error if the file doesn't exist or has an unsupported extension.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.is_file() {
            return Err(CatalogError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("snapshot file not found: {}", path.display()),
            )));
        }

        match Self::extension(&path) {
            Some("json" | "toml") => Ok(Self { path }),
            _ => Err(CatalogError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the snapshot.
    pub fn load(&self) -> Result<ConfiguratorSnapshot> {
        let contents = std::fs::read_to_string(&self.path)?;
        let label = self.path.display().to_string();

        let snapshot = if Self::extension(&self.path) == Some("toml") {
            toml::from_str(&contents).map_err(|e| CatalogError::ParseError {
                path: label.clone(),
                reason: e.to_string(),
            })?
        } else {
            parse_snapshot_json(&contents, &label)?
        };

        debug!(path = %label, "read configurator snapshot");
        Ok(snapshot)
    }

    fn extension(path: &Path) -> Option<&str> {
        path.extension().and_then(|s| s.to_str())
    }
}

/// Parse a snapshot from JSON text; `label` names the source in errors.
pub fn parse_snapshot_json(contents: &str, label: &str) -> Result<ConfiguratorSnapshot> {
    serde_json::from_str(contents).map_err(|e| CatalogError::ParseError {
        path: label.to_string(),
        reason: e.to_string(),
    })
}
