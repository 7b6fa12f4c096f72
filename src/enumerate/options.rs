// SPDX-License-Identifier: Apache-2.0

//! Mining configuration.
//!
//! These are policy knobs; library callers set them directly or load them
//! from JSON with `MiningOptions::from_json_str`.

use serde::{Deserialize, Serialize};

use crate::canon::LabelingStrategy;
use crate::enumerate::defaults::{DEFAULT_MAX_PORTS, DEFAULT_SIZE};
use crate::graph::MAX_NODES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Only occurrences whose non-root vertices are consumed inside the
    /// occurrence are accepted.
    #[default]
    SingleOutput,
    /// Any occurrence is accepted; every boundary output costs a port.
    MultiOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningOptions {
    /// Strictly increasing occurrence sizes. The first pass is exhaustive;
    /// later passes only grow the best frontier occurrences of the previous
    /// one.
    pub sizes: Vec<usize>,

    pub max_ports: usize,

    /// Frontier occurrences kept per pattern between passes. `None` keeps all
    /// of them, which makes deepening exhaustive.
    pub x_best: Option<usize>,

    /// Worker threads. `None` uses the number of available cores.
    pub threads: Option<usize>,

    pub strategy: LabelingStrategy,

    pub output_mode: OutputMode,

    /// Also return the frontier reached by the final pass, so callers can
    /// resume deepening from it.
    pub keep_frontier: bool,

    /// If set, each worker emits `log::info!` progress every N seeds.
    pub progress_every_seeds: Option<u64>,
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self {
            sizes: vec![DEFAULT_SIZE],
            max_ports: DEFAULT_MAX_PORTS,
            x_best: None,
            threads: None,
            strategy: LabelingStrategy::default(),
            output_mode: OutputMode::default(),
            keep_frontier: false,
            progress_every_seeds: None,
        }
    }
}

impl MiningOptions {
    /// Single exhaustive pass up to `size`.
    pub fn exhaustive(size: usize, max_ports: usize) -> Self {
        Self {
            sizes: vec![size],
            max_ports,
            ..Self::default()
        }
    }

    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn is_heuristic(&self) -> bool {
        self.sizes.len() > 1 && self.x_best.is_some()
    }

    pub fn validate(&self, has_ranking: bool) -> Result<(), MiningError> {
        if self.sizes.is_empty() {
            return Err(MiningError::EmptySchedule);
        }
        for &size in &self.sizes {
            if size < 2 {
                return Err(MiningError::SizeTooSmall(size));
            }
            if size >= MAX_NODES {
                return Err(MiningError::SizeTooLarge(size));
            }
        }
        if let Some(w) = self.sizes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(MiningError::NonIncreasingSchedule {
                previous: w[0],
                next: w[1],
            });
        }
        if self.x_best == Some(0) {
            return Err(MiningError::ZeroBest);
        }
        if self.threads == Some(0) {
            return Err(MiningError::ZeroThreads);
        }
        if self.is_heuristic() && !has_ranking {
            return Err(MiningError::MissingRanking);
        }
        Ok(())
    }

    pub fn from_json_str(text: &str) -> Result<Self, MiningError> {
        serde_json::from_str(text).map_err(|e| MiningError::InvalidConfig(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, MiningError> {
        serde_json::to_string_pretty(self).map_err(|e| MiningError::InvalidConfig(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiningError {
    EmptySchedule,
    /// Patterns have at least two operation nodes.
    SizeTooSmall(usize),
    SizeTooLarge(usize),
    NonIncreasingSchedule {
        previous: usize,
        next: usize,
    },
    ZeroBest,
    ZeroThreads,
    /// A finite `x_best` across several passes needs a ranking to pick by.
    MissingRanking,
    InvalidConfig(String),
}

impl std::fmt::Display for MiningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MiningError::EmptySchedule => write!(f, "size schedule is empty"),
            MiningError::SizeTooSmall(size) => {
                write!(f, "occurrence size {} is below the minimum of 2", size)
            }
            MiningError::SizeTooLarge(size) => write!(
                f,
                "occurrence size {} exceeds the supported maximum of {}",
                size,
                MAX_NODES - 1
            ),
            MiningError::NonIncreasingSchedule { previous, next } => write!(
                f,
                "size schedule must be strictly increasing; got {} then {}",
                previous, next
            ),
            MiningError::ZeroBest => write!(f, "x_best must be at least 1"),
            MiningError::ZeroThreads => write!(f, "threads must be at least 1"),
            MiningError::MissingRanking => write!(
                f,
                "a multi-pass schedule with a finite x_best requires an occurrence ranking"
            ),
            MiningError::InvalidConfig(msg) => write!(f, "invalid mining configuration: {}", msg),
        }
    }
}

impl std::error::Error for MiningError {}
