use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use super::WeeklyPlan;

/// JSON file holding the weekly plan, full recipes included, so the grocery
/// list can be rebuilt without the recipe provider.
#[derive(Debug, Clone)]
pub struct PlanStore {
    path: PathBuf,
}

impl PlanStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing, unreadable or corrupt file yields an empty plan.
    pub async fn load(&self) -> WeeklyPlan {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved plan, starting empty");
                return WeeklyPlan::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), "failed to read saved plan: {}", e);
                return WeeklyPlan::default();
            }
        };

        match serde_json::from_str::<WeeklyPlan>(&content) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(path = %self.path.display(), "saved plan is corrupt, starting empty: {}", e);
                WeeklyPlan::default()
            }
        }
    }

    pub async fn save(&self, plan: &WeeklyPlan) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create plan directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(plan).context("Failed to serialize weekly plan")?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write plan file '{}'", self.path.display()))?;
        debug!(path = %self.path.display(), "plan saved");
        Ok(())
    }
}
