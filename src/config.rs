//! Solver configuration and startup
//!
//! Everything that must exist before the first solve is loaded here. Any
//! failure is fatal: the caller reports it and exits.

use crate::catalog::PrincipleCatalog;
use crate::llm::{GroqClient, LlmConfig};
use crate::matrix::ContradictionMatrix;
use crate::session::{SessionOptions, SolverSession};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_MATRIX_PATH: &str = "data/triz_matrix.json";

#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Compiled contradiction matrix (output of `triz-compile`)
    pub matrix_path: PathBuf,

    /// Principle catalog; the built-in list of 40 when unset
    pub principles_path: Option<PathBuf>,

    pub llm: LlmConfig,

    pub session: SessionOptions,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            matrix_path: PathBuf::from(DEFAULT_MATRIX_PATH),
            principles_path: None,
            llm: LlmConfig::default(),
            session: SessionOptions::default(),
        }
    }
}

impl SolverConfig {
    pub fn load_catalog(&self) -> Result<PrincipleCatalog> {
        match &self.principles_path {
            Some(path) => PrincipleCatalog::load(path),
            None => Ok(PrincipleCatalog::standard()),
        }
    }

    /// Load the static data and build the model client.
    pub fn build_session(&self) -> Result<SolverSession<GroqClient>> {
        let matrix = ContradictionMatrix::load(&self.matrix_path)?;
        if matrix.is_empty() {
            bail!("Contradiction matrix {:?} has no records", self.matrix_path);
        }

        let catalog = self.load_catalog()?;
        tracing::info!(principles = catalog.len(), "Principle catalog ready");

        let client = GroqClient::new(self.llm.clone()).context("Failed to initialize model client")?;
        tracing::info!(model = client.model(), "Model client ready");

        Ok(SolverSession::new(client, matrix, catalog).with_options(self.session))
    }
}
