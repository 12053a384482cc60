//! Dataset handle and the profiler collaborator contract.
//!
//! The workbench never computes column statistics itself; it hands raw file
//! bytes to an external [`DatasetProfiler`] and stores whatever comes back.

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-column summary statistics, tagged by column type on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ColumnStats {
    Numeric {
        mean: f64,
        #[serde(rename = "stdDev")]
        std_dev: f64,
    },
    Textual {
        #[serde(rename = "avgLen")]
        avg_len: f64,
        #[serde(rename = "maxLen")]
        max_len: u64,
        #[serde(rename = "minLen")]
        min_len: u64,
        #[serde(rename = "uniqueCount")]
        unique_count: u64,
    },
}

/// Column name to statistics, in stable column order.
pub type StatsMap = BTreeMap<String, ColumnStats>;

/// The active dataset: file name, the raw bytes it was loaded from, and the
/// profiler's per-column statistics. The core only stores and round-trips
/// this; it never interprets the bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetHandle {
    pub file_name: String,
    pub content: Vec<u8>,
    pub stats: StatsMap,
}

impl DatasetHandle {
    /// Column names available to analysis windows.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.stats.keys().map(String::as_str)
    }
}

/// External collaborator that turns raw file bytes into column statistics.
#[async_trait]
pub trait DatasetProfiler: Send + Sync {
    /// Profiles the given file content.
    ///
    /// # Arguments
    ///
    /// * `file_name` - Original file name (used for format detection)
    /// * `content` - Raw file bytes
    ///
    /// # Returns
    ///
    /// A mapping from column name to its summary statistics.
    async fn profile(&self, file_name: &str, content: &[u8]) -> AnyResult<StatsMap>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_stats_use_wire_field_names() {
        let stats = ColumnStats::Numeric {
            mean: 4.5,
            std_dev: 1.25,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["type"], "Numeric");
        assert_eq!(json["stdDev"], 1.25);
    }

    #[test]
    fn textual_stats_round_trip() {
        let stats = ColumnStats::Textual {
            avg_len: 42.0,
            max_len: 300,
            min_len: 3,
            unique_count: 117,
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: ColumnStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn columns_follow_stats_order() {
        let mut stats = StatsMap::new();
        stats.insert(
            "review".into(),
            ColumnStats::Textual {
                avg_len: 10.0,
                max_len: 20,
                min_len: 1,
                unique_count: 5,
            },
        );
        stats.insert(
            "score".into(),
            ColumnStats::Numeric {
                mean: 3.0,
                std_dev: 0.5,
            },
        );
        let handle = DatasetHandle {
            file_name: "reviews.csv".into(),
            content: b"raw".to_vec(),
            stats,
        };
        let cols: Vec<_> = handle.columns().collect();
        assert_eq!(cols, ["review", "score"]);
    }
}
