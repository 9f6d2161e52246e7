// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop around any MemoryModel:
//
//   for t in 1..=epochs
//     lr = annealed_learning_rate(t)
//     fit every batch of a fresh permutation of batch_ranges
//     every evaluation_interval epochs:
//       predict train / val / test, log accuracy
//   final test evaluation, close summaries
//
// The annealing schedule halves the base rate every anneal_rate
// epochs up to anneal_stop_epoch and holds it from then on.
//
// Key Burn insight:
//   - Training uses Autodiff<Wgpu> or Autodiff<NdArray>
//   - The learner evaluates on the inner backend via model.valid()

use std::{fmt, str::FromStr};

use anyhow::{ensure, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    tensor::backend::{AutodiffBackend, Backend},
};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::batch_ranges, dataset::VectorizedSet};
use crate::domain::traits::MemoryModel;
use crate::infra::metrics::{accuracy, EpochMetrics, SummaryRow, SummaryWriters, TrainingReport};
use crate::ml::learner::build_learner;
use crate::ml::model::MemN2NConfig;

/// Which Burn backend runs the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Wgpu,
    Ndarray,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wgpu" => Ok(Self::Wgpu),
            "ndarray" => Ok(Self::Ndarray),
            other => Err(format!("unknown backend '{other}' (expected wgpu or ndarray)")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wgpu => f.write_str("wgpu"),
            Self::Ndarray => f.write_str("ndarray"),
        }
    }
}

/// The three vectorised splits of one task.
#[derive(Debug, Clone)]
pub struct TrainingSets {
    pub train: VectorizedSet,
    pub val:   VectorizedSet,
    pub test:  VectorizedSet,
}

/// Stepped learning rate for 1-based `epoch`.
///
/// rate = base / 2^((t - 1) div anneal_rate) for t <= anneal_stop_epoch,
/// frozen at the anneal_stop_epoch value afterwards.
pub fn annealed_learning_rate(cfg: &TrainConfig, epoch: usize) -> f64 {
    let t = epoch.min(cfg.anneal_stop_epoch.max(1)).max(1);
    let halvings = (t - 1) / cfg.anneal_rate.max(1);
    cfg.learning_rate / 2f64.powi(halvings as i32)
}

/// Build the MemN2N learner on the configured backend and train it.
pub fn run_training<R: Rng>(
    cfg:     &TrainConfig,
    sets:    &TrainingSets,
    writers: SummaryWriters,
    rng:     &mut R,
) -> Result<TrainingReport> {
    match cfg.backend {
        BackendKind::Wgpu => {
            let device = WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            train_on::<Autodiff<Wgpu>, R>(cfg, sets, writers, rng, device)
        }
        BackendKind::Ndarray => {
            let device = NdArrayDevice::Cpu;
            tracing::info!("Using NdArray device: {:?}", device);
            train_on::<Autodiff<NdArray>, R>(cfg, sets, writers, rng, device)
        }
    }
}

fn train_on<B: AutodiffBackend, R: Rng>(
    cfg:     &TrainConfig,
    sets:    &TrainingSets,
    writers: SummaryWriters,
    rng:     &mut R,
    device:  <B as Backend>::Device,
) -> Result<TrainingReport> {
    if let Some(seed) = cfg.random_state {
        B::seed(seed);
    }

    let model_cfg = MemN2NConfig::new(
        sets.train.vocab_size(),
        sets.train.sentence_size(),
        cfg.embedding_size,
    )
    .with_hops(cfg.hops);

    let mut learner = build_learner::<B>(&model_cfg, cfg.max_grad_norm, cfg.batch_size, device);
    train_loop(cfg, sets, &mut learner, writers, rng)
}

/// Run the epoch loop against any MemoryModel.
///
/// The summary writers are owned for the whole run; they are closed on
/// success and flushed on drop if an error ends the loop early.
pub fn train_loop<M: MemoryModel, R: Rng + ?Sized>(
    cfg:         &TrainConfig,
    sets:        &TrainingSets,
    model:       &mut M,
    mut writers: SummaryWriters,
    rng:         &mut R,
) -> Result<TrainingReport> {
    ensure!(!sets.train.is_empty(), "Training set is empty");
    ensure!(cfg.evaluation_interval > 0, "evaluation_interval must be greater than 0");

    let batches = batch_ranges(sets.train.len(), cfg.batch_size);
    if batches.is_empty() {
        tracing::warn!(
            "No full batch of {} in {} training examples; parameters will not be updated",
            cfg.batch_size,
            sets.train.len()
        );
    }

    let train_labels = sets.train.labels();
    let val_labels   = sets.val.labels();
    let test_labels  = sets.test.labels();

    let mut history = Vec::new();
    let mut learning_rate = cfg.learning_rate;
    let mut total_cost = 0.0;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        learning_rate = annealed_learning_rate(cfg, epoch);

        let mut order = batches.clone();
        order.shuffle(rng);

        total_cost = 0.0;
        for range in order {
            total_cost += model.batch_fit(sets.train.batch(range), learning_rate)?;
        }
        tracing::debug!("Epoch {} total cost {:.4} (lr={})", epoch, total_cost, learning_rate);

        // ── Evaluation ────────────────────────────────────────────────────────
        if epoch % cfg.evaluation_interval == 0 {
            let train_acc = accuracy(&model.predict(sets.train.items())?, &train_labels);
            let val_acc   = accuracy(&model.predict(sets.val.items())?, &val_labels);
            let test_acc  = accuracy(&model.predict(sets.test.items())?, &test_labels);

            writers.train.log(&SummaryRow::new(epoch, learning_rate, total_cost, train_acc))?;
            writers.val.log(&SummaryRow::new(epoch, learning_rate, total_cost, val_acc))?;
            writers.test.log(&SummaryRow::new(epoch, learning_rate, total_cost, test_acc))?;

            println!(
                "Epoch {:>3}/{} | lr={:.6} | total_cost={:.4} | train_acc={:.1}% | val_acc={:.1}% | test_acc={:.1}%",
                epoch,
                cfg.epochs,
                learning_rate,
                total_cost,
                train_acc * 100.0,
                val_acc * 100.0,
                test_acc * 100.0,
            );

            history.push(EpochMetrics {
                epoch,
                learning_rate,
                total_cost,
                train_accuracy: train_acc,
                val_accuracy:   val_acc,
                test_accuracy:  test_acc,
            });
        }
    }

    // ── Final test evaluation ─────────────────────────────────────────────────
    let final_test_accuracy = accuracy(&model.predict(sets.test.items())?, &test_labels);
    writers
        .test
        .log(&SummaryRow::new(cfg.epochs, learning_rate, total_cost, final_test_accuracy))?;
    writers.close()?;

    tracing::info!("Testing Accuracy: {:.4}", final_test_accuracy);

    Ok(TrainingReport {
        epochs: cfg.epochs,
        n_train: sets.train.len(),
        n_val: sets.val.len(),
        n_test: sets.test.len(),
        final_test_accuracy,
        history,
    })
}
