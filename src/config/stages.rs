//! Stage catalog: named deployment targets in configuration order

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Name of the production stage
pub const PRODUCTION_STAGE: &str = "online";
/// Branch the production stage releases from when none is configured
pub const DEFAULT_PRODUCTION_BRANCH: &str = "master";

/// One stage entry as written in the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StageEntry {
    /// Bare branch name
    Branch(String),
    Detailed(StageDetail),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDetail {
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default, alias = "appJob", alias = "jenkins")]
    pub job_identifier: Option<String>,
}

/// Normalized stage: the branch it deploys from and the build job to trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
    pub branch: String,
    pub job_identifier: Option<String>,
}

impl StageConfig {
    fn from_entry(entry: StageEntry) -> Self {
        match entry {
            StageEntry::Branch(branch) => Self {
                branch,
                job_identifier: None,
            },
            StageEntry::Detailed(detail) => Self {
                branch: detail.branch.unwrap_or_default(),
                job_identifier: detail.job_identifier.filter(|job| !job.trim().is_empty()),
            },
        }
    }
}

/// Stage lookup keeping the order stages were declared in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageCatalog {
    entries: Vec<(String, StageConfig)>,
}

impl StageCatalog {
    /// Build from raw entries, guaranteeing a production stage with a branch
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, StageEntry)>,
    {
        let mut catalog = Self::default();
        for (name, entry) in entries {
            catalog.insert(name, StageConfig::from_entry(entry));
        }
        catalog.normalize_production();
        catalog
    }

    fn insert(&mut self, name: String, config: StageConfig) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = config,
            None => self.entries.push((name, config)),
        }
    }

    fn normalize_production(&mut self) {
        match self
            .entries
            .iter_mut()
            .find(|(name, _)| name == PRODUCTION_STAGE)
        {
            Some((_, config)) => {
                if config.branch.trim().is_empty() {
                    config.branch = DEFAULT_PRODUCTION_BRANCH.to_string();
                }
            }
            None => self.entries.push((
                PRODUCTION_STAGE.to_string(),
                StageConfig {
                    branch: DEFAULT_PRODUCTION_BRANCH.to_string(),
                    job_identifier: None,
                },
            )),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&StageConfig> {
        self.entries
            .iter()
            .find(|(stage, _)| stage == name)
            .map(|(_, config)| config)
    }

    /// Branch the production stage deploys from
    pub fn production_branch(&self) -> &str {
        self.get(PRODUCTION_STAGE)
            .map(|config| config.branch.as_str())
            .unwrap_or(DEFAULT_PRODUCTION_BRANCH)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for StageCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = StageCatalog;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of stage names to branches or stage objects")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(StageCatalog::from_entries(Vec::new()))
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, entry)) = access.next_entry::<String, StageEntry>()? {
                    entries.push((name, entry));
                }
                Ok(StageCatalog::from_entries(entries))
            }
        }

        deserializer.deserialize_any(CatalogVisitor)
    }
}
