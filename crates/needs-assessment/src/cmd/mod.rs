pub mod answers;
pub mod check;
pub mod config;
pub mod plan;
pub mod submit;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use needs_lib::{HttpNeedsApi, NeedsApi, NeedsConfig};
use needs_spec::{FlowKind, QuestionCatalog};

/// Where the question catalog comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogSource {
    /// Question catalog as a JSON array; fetched from the API when omitted
    #[arg(long, value_name = "questions.json")]
    pub catalog: Option<PathBuf>,
}

impl CatalogSource {
    pub async fn load(&self, config: &NeedsConfig) -> Result<QuestionCatalog> {
        match &self.catalog {
            Some(path) => read_catalog(path),
            None => {
                let api = HttpNeedsApi::new(config.api.clone())?;
                let questions = api
                    .fetch_questions()
                    .await
                    .with_context(|| format!("failed to fetch catalog from {}", config.api.base_url))?;
                Ok(QuestionCatalog::new(questions))
            }
        }
    }
}

pub fn read_catalog(path: &Path) -> Result<QuestionCatalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let catalog = QuestionCatalog::from_json(&raw)
        .with_context(|| format!("invalid catalog {}", path.display()))?;
    tracing::debug!(path = %path.display(), questions = catalog.questions().len(), "catalog read");
    Ok(catalog)
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlowArg {
    #[default]
    Client,
    Staff,
}

impl From<FlowArg> for FlowKind {
    fn from(flow: FlowArg) -> Self {
        match flow {
            FlowArg::Client => FlowKind::Client,
            FlowArg::Staff => FlowKind::Staff,
        }
    }
}
