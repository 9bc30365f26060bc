//! The compiled contradiction matrix
//!
//! A flat, ordered list of records. Lookups are linear scans; the matrix is
//! small (at most 39 x 39 cells) and only read once per solve.

use crate::types::ContradictionRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContradictionMatrix {
    records: Vec<ContradictionRecord>,
}

impl ContradictionMatrix {
    pub fn new(records: Vec<ContradictionRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read contradiction matrix {:?}", path))?;
        let matrix: Self = serde_json::from_str(&content)
            .with_context(|| format!("Malformed contradiction matrix {:?}", path))?;
        tracing::info!(records = matrix.len(), "Loaded contradiction matrix from {:?}", path);
        Ok(matrix)
    }

    /// Pretty JSON with two-space indentation; non-ASCII is written as-is.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Write the matrix so that `path` either holds the complete document or
    /// is left untouched.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "matrix.json".to_string());
        let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        {
            let mut file = std::fs::File::create(&tmp_path)
                .with_context(|| format!("Failed to create {:?}", tmp_path))?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }

        if let Err(e) = std::fs::rename(&tmp_path, path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e).with_context(|| format!("Failed to write {:?}", path));
        }
        Ok(())
    }

    pub fn records(&self) -> &[ContradictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose improving label equals `label` exactly
    pub fn find_improving(&self, label: &str) -> Option<&ContradictionRecord> {
        self.records.iter().find(|r| r.improving == label)
    }

    /// Record for one exact (improving, worsening) pair
    pub fn find_pair(&self, improving: &str, worsening: &str) -> Option<&ContradictionRecord> {
        self.records
            .iter()
            .find(|r| r.improving == improving && r.worsening == worsening)
    }

    /// Distinct improving labels in order of first appearance
    pub fn improving_labels(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.improving.as_str()))
    }

    /// Distinct worsening labels in order of first appearance
    pub fn worsening_labels(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.worsening.as_str()))
    }
}

fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    labels.filter(|l| seen.insert(*l)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(improving: &str, worsening: &str, principles: &[u32]) -> ContradictionRecord {
        ContradictionRecord {
            improving: improving.to_string(),
            worsening: worsening.to_string(),
            principles: principles.to_vec(),
        }
    }

    fn sample() -> ContradictionMatrix {
        ContradictionMatrix::new(vec![
            record("Strength", "Weight", &[1, 8, 15]),
            record("Speed", "Weight", &[2, 14]),
            record("Strength", "Length", &[40]),
        ])
    }

    #[test]
    fn test_find_improving_returns_first() {
        let matrix = sample();
        let found = matrix.find_improving("Strength").unwrap();
        assert_eq!(found.worsening, "Weight");
        assert!(matrix.find_improving("strength").is_none());
    }

    #[test]
    fn test_find_pair() {
        let matrix = sample();
        assert_eq!(matrix.find_pair("Strength", "Length").unwrap().principles, vec![40]);
        assert!(matrix.find_pair("Speed", "Length").is_none());
    }

    #[test]
    fn test_labels_first_appearance_order() {
        let matrix = sample();
        assert_eq!(matrix.improving_labels(), vec!["Strength", "Speed"]);
        assert_eq!(matrix.worsening_labels(), vec!["Weight", "Length"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.json");
        let matrix = ContradictionMatrix::new(vec![record("Température", "Poids", &[3])]);

        matrix.save(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Température"));
        assert!(raw.starts_with("[\n  {"));

        let loaded = ContradictionMatrix::load(&path).unwrap();
        assert_eq!(loaded, matrix);
        assert!(!dir.path().join(".matrix.json.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("triz_matrix.json");
        let matrix = ContradictionMatrix::new(vec![record("Speed", "Weight", &[2, 14])]);

        matrix.save(&path).unwrap();
        assert_eq!(ContradictionMatrix::load(&path).unwrap(), matrix);
    }

    #[test]
    fn test_load_rejects_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"[{"improving": "Speed"}]"#).unwrap();
        assert!(ContradictionMatrix::load(&path).is_err());
        assert!(ContradictionMatrix::load(&dir.path().join("missing.json")).is_err());
    }
}
