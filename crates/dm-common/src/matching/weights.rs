use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

use crate::error::ConfigError;

/// The closed set of evidence tests. Each maps to one weight entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TestKind {
    /// Joined phrase appears verbatim in the domain.
    RootPhrase,
    /// Any single root word appears in the domain. Skipped when RootPhrase passed.
    AnyRootWord,
    /// Joined phrase appears in the domain at edit distance 1 or 2. Skipped when RootPhrase passed.
    MisspelledRootPhrase,
    /// Non-ignorable words glued onto the name inside a domain label. Penalty.
    SignificantAffixes,
    /// Root phrase appears in the text of the domain's home page.
    WebPageRef,
}

impl TestKind {
    /// Environment variable that overrides this test's weight, e.g. `DM_WEIGHT_ROOT_PHRASE`.
    pub fn env_key(self) -> String {
        format!("DM_WEIGHT_{}", self.as_ref().to_ascii_uppercase())
    }
}

/// Signed points awarded per passing test. Missing or zero entries disable a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    scores: HashMap<TestKind, i32>,
}

impl Default for Weights {
    fn default() -> Self {
        Self::from_pairs([
            (TestKind::RootPhrase, 50),
            (TestKind::AnyRootWord, 5),
            (TestKind::MisspelledRootPhrase, 5),
            (TestKind::SignificantAffixes, -10),
            (TestKind::WebPageRef, 50),
        ])
    }
}

impl Weights {
    pub fn empty() -> Self {
        Self {
            scores: HashMap::new(),
        }
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (TestKind, i32)>,
    {
        Self {
            scores: pairs.into_iter().collect(),
        }
    }

    /// Weight for `kind`; 0 when unconfigured.
    pub fn get(&self, kind: TestKind) -> i32 {
        self.scores.get(&kind).copied().unwrap_or(0)
    }

    pub fn set(&mut self, kind: TestKind, weight: i32) {
        self.scores.insert(kind, weight);
    }

    pub fn remove(&mut self, kind: TestKind) -> Option<i32> {
        self.scores.remove(&kind)
    }

    pub fn is_enabled(&self, kind: TestKind) -> bool {
        self.get(kind) != 0
    }

    /// Sum of all negative weights. Widened so extreme weights cannot overflow.
    pub fn min_total(&self) -> i64 {
        self.scores.values().filter(|v| **v < 0).map(|v| i64::from(*v)).sum()
    }

    /// Sum of all positive weights.
    pub fn max_total(&self) -> i64 {
        self.scores.values().filter(|v| **v > 0).map(|v| i64::from(*v)).sum()
    }

    /// Applies a `name=value` override such as `web_page_ref=0`.
    pub fn apply_override(&mut self, pair: &str) -> Result<(), ConfigError> {
        let (name, value) = pair.split_once('=').ok_or_else(|| ConfigError::InvalidWeight {
            key: pair.to_string(),
            value: String::new(),
        })?;
        let kind = TestKind::from_str(name.trim())
            .map_err(|_| ConfigError::UnknownTest(name.trim().to_string()))?;
        let weight = parse_weight(name.trim(), value)?;
        self.set(kind, weight);
        Ok(())
    }

    /// Defaults overlaid with any `DM_WEIGHT_<TEST>` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut weights = Self::default();
        for kind in TestKind::iter() {
            let key = kind.env_key();
            if let Ok(raw) = std::env::var(&key) {
                weights.set(kind, parse_weight(&key, &raw)?);
            }
        }
        Ok(weights)
    }
}

fn parse_weight(key: &str, raw: &str) -> Result<i32, ConfigError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ConfigError::InvalidWeight {
            key: key.to_string(),
            value: raw.to_string(),
        })
}
