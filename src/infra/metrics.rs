// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records evaluation results during training.
//
// One summary CSV per split, appended to every
// evaluation_interval epochs:
//
//   logs/train/summary.csv
//   logs/val/summary.csv
//   logs/test/summary.csv
//
// Example CSV output:
//   epoch,learning_rate,total_cost,accuracy
//   10,0.010000,412.913700,0.512000
//   20,0.005000,188.004100,0.873000
//
// total_cost is the summed training cost of the epoch, so it is
// the same in all three files; accuracy is per split. The test
// file gets one extra row for the final evaluation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Fraction of predictions equal to their label.
/// An empty set scores 0.0.
pub fn accuracy(predictions: &[usize], labels: &[usize]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(p, l)| p == l)
        .count();
    correct as f64 / labels.len() as f64
}

/// Results of one evaluation epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:          usize,
    pub learning_rate:  f64,
    /// Summed batch cost over the epoch
    pub total_cost:     f64,
    pub train_accuracy: f64,
    pub val_accuracy:   f64,
    pub test_accuracy:  f64,
}

/// Everything a finished run reports; saved as report.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs:              usize,
    pub n_train:             usize,
    pub n_val:               usize,
    pub n_test:              usize,
    pub final_test_accuracy: f64,
    pub history:             Vec<EpochMetrics>,
}

impl TrainingReport {
    /// Evaluation with the best validation accuracy (earliest on ties).
    pub fn best_by_val(&self) -> Option<&EpochMetrics> {
        self.history.iter().fold(None, |best, m| match best {
            Some(b) if b.val_accuracy >= m.val_accuracy => Some(b),
            _ => Some(m),
        })
    }
}

/// One CSV row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub epoch:         usize,
    pub learning_rate: f64,
    pub total_cost:    f64,
    pub accuracy:      f64,
}

impl SummaryRow {
    pub fn new(epoch: usize, learning_rate: f64, total_cost: f64, accuracy: f64) -> Self {
        Self { epoch, learning_rate, total_cost, accuracy }
    }
}

/// Buffered CSV writer for one split's summary file.
///
/// Rows are flushed on close, or on drop if the run ends early.
pub struct SummaryWriter {
    csv_path: PathBuf,
    out:      BufWriter<File>,
}

impl SummaryWriter {
    pub const HEADER: &'static str = "epoch,learning_rate,total_cost,accuracy";

    /// Create `{dir}/summary.csv`, truncating any previous file.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("summary.csv");
        let file = File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;

        let mut out = BufWriter::new(file);
        writeln!(out, "{}", Self::HEADER)?;
        tracing::debug!("Created summary CSV: '{}'", csv_path.display());

        Ok(Self { csv_path, out })
    }

    pub fn log(&mut self, row: &SummaryRow) -> Result<()> {
        writeln!(
            self.out,
            "{},{:.6},{:.6},{:.6}",
            row.epoch, row.learning_rate, row.total_cost, row.accuracy,
        )
        .with_context(|| format!("Cannot write to '{}'", self.csv_path.display()))
    }

    pub fn close(mut self) -> Result<()> {
        self.out
            .flush()
            .with_context(|| format!("Cannot flush '{}'", self.csv_path.display()))
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

impl Drop for SummaryWriter {
    fn drop(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::warn!("Failed to flush '{}': {}", self.csv_path.display(), e);
        }
    }
}

/// The train / val / test summary writers of one run.
pub struct SummaryWriters {
    pub train: SummaryWriter,
    pub val:   SummaryWriter,
    pub test:  SummaryWriter,
}

impl SummaryWriters {
    pub fn open(log_dir: &Path) -> Result<Self> {
        Ok(Self {
            train: SummaryWriter::create(&log_dir.join("train"))?,
            val:   SummaryWriter::create(&log_dir.join("val"))?,
            test:  SummaryWriter::create(&log_dir.join("test"))?,
        })
    }

    pub fn close(self) -> Result<()> {
        self.train.close()?;
        self.val.close()?;
        self.test.close()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(epoch: usize, val_accuracy: f64) -> EpochMetrics {
        EpochMetrics {
            epoch,
            learning_rate: 0.01,
            total_cost: 1.0,
            train_accuracy: 0.0,
            val_accuracy,
            test_accuracy: 0.0,
        }
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[1, 2, 3, 4], &[1, 2, 0, 0]), 0.5);
        assert_eq!(accuracy(&[7], &[7]), 1.0);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_writer_emits_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = SummaryWriter::create(&dir.path().join("train")).unwrap();
        w.log(&SummaryRow::new(10, 0.01, 12.5, 0.75)).unwrap();
        let path = w.csv_path().to_path_buf();
        w.close().unwrap();

        let text = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![SummaryWriter::HEADER, "10,0.010000,12.500000,0.750000"]);
    }

    #[test]
    fn test_writer_flushes_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut w = SummaryWriter::create(dir.path()).unwrap();
            w.log(&SummaryRow::new(1, 0.5, 1.0, 0.0)).unwrap();
        }
        let text = fs::read_to_string(dir.path().join("summary.csv")).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_open_creates_split_dirs() {
        let dir = tempfile::tempdir().unwrap();
        SummaryWriters::open(dir.path()).unwrap().close().unwrap();
        for split in ["train", "val", "test"] {
            assert!(dir.path().join(split).join("summary.csv").is_file());
        }
    }

    #[test]
    fn test_best_by_val_prefers_earliest() {
        let report = TrainingReport {
            epochs: 30,
            n_train: 1,
            n_val: 1,
            n_test: 1,
            final_test_accuracy: 0.0,
            history: vec![metrics(10, 0.4), metrics(20, 0.9), metrics(30, 0.9)],
        };
        assert_eq!(report.best_by_val().map(|m| m.epoch), Some(20));

        let empty = TrainingReport { history: vec![], ..report };
        assert!(empty.best_by_val().is_none());
    }
}
