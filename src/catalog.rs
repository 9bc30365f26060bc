//! The 40 inventive principles
//!
//! Loaded once from a JSON file shaped like
//! `{"TRIZ_40_Principles": [{"1": "Segmentation"}, {"2": "Taking out"}, ...]}`.
//! Keys may be strings or integers. A bare top-level list is accepted too.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Name returned for principle numbers missing from the catalog
pub const UNKNOWN_PRINCIPLE: &str = "Unknown";

const CATALOG_KEY: &str = "TRIZ_40_Principles";

const STANDARD_NAMES: [&str; 40] = [
    "Segmentation",
    "Taking out",
    "Local quality",
    "Asymmetry",
    "Merging",
    "Universality",
    "Nested doll",
    "Anti-weight",
    "Preliminary anti-action",
    "Preliminary action",
    "Beforehand cushioning",
    "Equipotentiality",
    "The other way round",
    "Spheroidality - Curvature",
    "Dynamics",
    "Partial or excessive actions",
    "Another dimension",
    "Mechanical vibration",
    "Periodic action",
    "Continuity of useful action",
    "Skipping",
    "Blessing in disguise",
    "Feedback",
    "Intermediary",
    "Self-service",
    "Copying",
    "Cheap short-living objects",
    "Mechanics substitution",
    "Pneumatics and hydraulics",
    "Flexible shells and thin films",
    "Porous materials",
    "Color changes",
    "Homogeneity",
    "Discarding and recovering",
    "Parameter changes",
    "Phase transitions",
    "Thermal expansion",
    "Strong oxidants",
    "Inert atmosphere",
    "Composite materials",
];

/// Principle number to name, immutable once built
#[derive(Debug, Clone, Default)]
pub struct PrincipleCatalog {
    names: BTreeMap<u32, String>,
}

impl PrincipleCatalog {
    /// The classic Altshuller list, numbered 1..=40
    pub fn standard() -> Self {
        let names = STANDARD_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| (i as u32 + 1, name.to_string()))
            .collect();
        Self { names }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read principle catalog {:?}", path))?;
        Self::from_json(&content)
            .with_context(|| format!("Malformed principle catalog {:?}", path))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(content)?;

        let items = match &doc {
            Value::Object(map) => map
                .get(CATALOG_KEY)
                .and_then(Value::as_array)
                .ok_or_else(|| anyhow!("missing \"{}\" list", CATALOG_KEY))?,
            Value::Array(items) => items,
            _ => bail!("expected an object or a list"),
        };

        let mut names = BTreeMap::new();
        for item in items {
            let entry = item
                .as_object()
                .ok_or_else(|| anyhow!("catalog entry is not an object: {}", item))?;
            for (key, value) in entry {
                let number: u32 = key
                    .trim()
                    .parse()
                    .with_context(|| format!("principle key {:?} is not a number", key))?;
                let name = value
                    .as_str()
                    .ok_or_else(|| anyhow!("principle {} has a non-string name", number))?;
                names.insert(number, name.to_string());
            }
        }

        Ok(Self { names })
    }

    /// Name for a principle number, or `"Unknown"`
    pub fn name_of(&self, number: u32) -> &str {
        self.names
            .get(&number)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_PRINCIPLE)
    }

    pub fn contains(&self, number: u32) -> bool {
        self.names.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
