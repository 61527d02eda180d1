//! Result writer
//!
//! Turns a finished [`ExportSession`] into named JSON artifacts: one per
//! diagram kind with content, plus `ports.json` when ports were registered.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::ExportSession;
use crate::core::{ExportConfig, ExportError};

/// Name of the ports artifact
pub const PORTS_ARTIFACT: &str = "ports.json";

/// Output files keyed by file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputArtifacts {
    files: BTreeMap<String, String>,
}

impl OutputArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }

    /// Serialize `value` and store it under `name`
    pub fn insert_json(
        &mut self,
        name: impl Into<String>,
        value: &Value,
        config: &ExportConfig,
    ) -> Result<(), ExportError> {
        let content = if config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        self.insert(name, content);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every artifact into `dir`, creating it if needed
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.files.len());
        for (name, content) in &self.files {
            let path = dir.join(name);
            fs::write(&path, content)?;
            debug!(path = %path.display(), bytes = content.len(), "Wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}

/// Serializes accumulated session tables
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultWriter {
    config: ExportConfig,
}

impl ResultWriter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Collect the artifacts of every exporter and the ports table
    pub fn collect(&self, session: &ExportSession) -> Result<OutputArtifacts, ExportError> {
        let mut artifacts = OutputArtifacts::new();
        for exporter in session.exporters().iter() {
            exporter.save_results(session.ids(), &mut artifacts, &self.config)?;
        }
        if !session.ports().is_empty() {
            artifacts.insert_json(
                PORTS_ARTIFACT,
                &session.ports().to_json(session.ids()),
                &self.config,
            )?;
        }
        info!(artifacts = artifacts.len(), "Collected export results");
        Ok(artifacts)
    }
}
