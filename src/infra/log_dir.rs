// ============================================================
// Layer 6 — Run Directory
// ============================================================
// Owns the log directory of one training run:
//
//   logs/
//     config.json        ← TrainConfig the run used
//     report.json        ← TrainingReport written at the end
//     train/summary.csv  ┐
//     val/summary.csv    ├ written by SummaryWriters
//     test/summary.csv   ┘
//
// The directory is wiped at the start of every run so the
// summaries never mix two runs.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::metrics::{SummaryWriters, TrainingReport};

pub struct LogDir {
    root: PathBuf,
}

impl LogDir {
    pub const SPLITS: [&'static str; 3] = ["train", "val", "test"];

    /// Remove any previous contents of `root` and recreate it with
    /// one empty directory per split.
    pub fn reset(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.exists() {
            fs::remove_dir_all(&root)
                .with_context(|| format!("Cannot clear log directory '{}'", root.display()))?;
        }
        for split in Self::SPLITS {
            let dir = root.join(split);
            fs::create_dir_all(&dir)
                .with_context(|| format!("Cannot create log directory '{}'", dir.display()))?;
        }

        tracing::debug!("Reset log directory '{}'", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn summary_writers(&self) -> Result<SummaryWriters> {
        SummaryWriters::open(&self.root)
    }

    pub fn save_config<T: Serialize>(&self, cfg: &T) -> Result<()> {
        self.write_json("config.json", cfg)
    }

    pub fn save_report(&self, report: &TrainingReport) -> Result<()> {
        self.write_json("report.json", report)
    }

    pub fn load_report(&self) -> Result<TrainingReport> {
        self.read_json("report.json")
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.root.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        tracing::debug!("Saved '{}'", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.root.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Invalid JSON in '{}'", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("logs");
        fs::create_dir_all(root.join("train")).unwrap();
        fs::write(root.join("train").join("summary.csv"), "stale").unwrap();

        let log_dir = LogDir::reset(&root).unwrap();
        assert!(log_dir.root().is_dir());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 3);
        assert_eq!(fs::read_dir(root.join("train")).unwrap().count(), 0);
    }

    #[test]
    fn test_report_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = LogDir::reset(dir.path().join("run")).unwrap();
        let report = TrainingReport {
            epochs: 5,
            n_train: 9,
            n_val: 1,
            n_test: 10,
            final_test_accuracy: 0.8,
            history: vec![],
        };
        log_dir.save_report(&report).unwrap();
        assert_eq!(log_dir.load_report().unwrap(), report);
    }

    #[test]
    fn test_save_config_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = LogDir::reset(dir.path()).unwrap();
        log_dir.save_config(&serde_json::json!({ "hops": 3 })).unwrap();

        let text = fs::read_to_string(dir.path().join("config.json")).unwrap();
        assert!(text.contains("\"hops\": 3"));
    }
}
