//! Search budget configuration.
//!
//! A search is unbounded by default. Large unsolvable instances exhaust the
//! whole reachable state space before reporting failure, so callers that
//! want an early answer can cap the number of expansions or the wall-clock
//! time.
//!
//! ```
//! use astar_solver::SearchConfig;
//! use std::time::Duration;
//!
//! let config = SearchConfig::from_toml_str(r#"
//!     max_expansions = 50000
//!     time_limit_secs = 2.5
//! "#).unwrap();
//!
//! assert_eq!(config.max_expansions, Some(50000));
//! assert_eq!(config.time_limit(), Some(Duration::from_secs_f64(2.5)));
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct SearchConfig {
    /// Stop after this many node expansions.
    #[serde(default)]
    pub max_expansions: Option<usize>,

    /// Stop once this many seconds have elapsed.
    #[serde(default)]
    pub time_limit_secs: Option<f64>,
}

impl SearchConfig {
    /// An unbounded configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = Some(limit.as_secs_f64());
        self
    }

    /// The time limit. Negative, NaN and values too large for a
    /// [`Duration`] (infinity included) mean no limit.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_expansions.is_none() && self.time_limit().is_none()
    }
}
