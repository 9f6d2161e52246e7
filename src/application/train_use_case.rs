// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Validate config, reset log dir  (Layer 6 - infra)
//   Step 2: Load the bAbI task              (Layer 4 - data)
//   Step 3: Corpus stats + vocabulary       (Layer 4 - data)
//   Step 4: Vectorise train and test        (Layer 4 - data)
//   Step 5: Split train/validation          (Layer 4 - data)
//   Step 6: Run training loop               (Layer 5 - ml)
//   Step 7: Save the report                 (Layer 6 - infra)

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    loader::BabiLoader,
    splitter::split_train_val,
    stats::CorpusStats,
    vectorizer::Vectorizer,
    vocabulary::Vocabulary,
};
use crate::domain::traits::TaskSource;
use crate::infra::{log_dir::LogDir, metrics::TrainingReport};
use crate::ml::trainer::{run_training, BackendKind, TrainingSets};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved as config.json next to the summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub learning_rate:       f64,
    pub anneal_rate:         usize,
    pub anneal_stop_epoch:   usize,
    pub max_grad_norm:       f64,
    pub evaluation_interval: usize,
    pub batch_size:          usize,
    pub hops:                usize,
    pub epochs:              usize,
    pub embedding_size:      usize,
    pub memory_size:         usize,
    pub task_id:             usize,
    pub random_state:        Option<u64>,
    pub data_dir:            String,
    pub log_dir:             String,
    pub val_fraction:        f64,
    pub only_supporting:     bool,
    pub backend:             BackendKind,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate:       0.01,
            anneal_rate:         10,
            anneal_stop_epoch:   100,
            max_grad_norm:       40.0,
            evaluation_interval: 10,
            batch_size:          32,
            hops:                3,
            epochs:              250,
            embedding_size:      30,
            memory_size:         50,
            task_id:             2,
            random_state:        None,
            data_dir:            "data/babi-tasks-v1-2/tasks_1-20_v1-2/en-10k".to_string(),
            log_dir:             "logs".to_string(),
            val_fraction:        0.1,
            only_supporting:     false,
            backend:             BackendKind::Wgpu,
        }
    }
}

impl TrainConfig {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=20).contains(&self.task_id),
            "task_id must be in 1..=20, got {}",
            self.task_id
        );
        for (name, value) in [
            ("batch_size", self.batch_size),
            ("hops", self.hops),
            ("epochs", self.epochs),
            ("evaluation_interval", self.evaluation_interval),
            ("anneal_rate", self.anneal_rate),
            ("embedding_size", self.embedding_size),
            ("memory_size", self.memory_size),
        ] {
            ensure!(value > 0, "{name} must be greater than 0");
        }
        ensure!(
            self.learning_rate > 0.0,
            "learning_rate must be positive, got {}",
            self.learning_rate
        );
        ensure!(
            self.max_grad_norm > 0.0,
            "max_grad_norm must be positive, got {}",
            self.max_grad_norm
        );
        ensure!(
            (0.0..1.0).contains(&self.val_fraction),
            "val_fraction must be in [0, 1), got {}",
            self.val_fraction
        );
        Ok(())
    }

    /// The run's random source: seeded when random_state is set.
    pub fn rng(&self) -> StdRng {
        match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

// ─── Data preparation ────────────────────────────────────────────────────────
/// Everything derived from one load of a task.
#[derive(Debug, Clone)]
pub struct PreparedTask {
    pub sets:  TrainingSets,
    pub vocab: Vocabulary,
    pub stats: CorpusStats,
}

/// Load a task once and turn it into vectorised train / val / test sets.
///
/// Shared by `train`, `inspect` and by tests that run on an in-memory task source.
pub fn prepare_sets<S: TaskSource, R: rand::Rng>(
    cfg:    &TrainConfig,
    source: &S,
    rng:    &mut R,
) -> Result<PreparedTask> {
    let splits = source.load_task(cfg.task_id)?;
    tracing::info!(
        "Task {}: {} train / {} test examples",
        cfg.task_id,
        splits.train.len(),
        splits.test.len()
    );
    ensure!(!splits.train.is_empty(), "Task {} has no training examples", cfg.task_id);

    // ── Corpus stats + vocabulary ─────────────────────────────────────────────
    let stats = CorpusStats::from_examples(splits.all());
    let memory_size = stats.memory_size(cfg.memory_size);
    let sentence_size = stats.sentence_size();
    let vocab = Vocabulary::build(splits.all(), memory_size);

    tracing::info!("Longest sentence length: {}", stats.max_sentence_size);
    tracing::info!("Longest story length: {}", stats.max_story_size);
    tracing::info!("Average story length: {}", stats.mean_story_size);
    tracing::info!(
        "Vocabulary size: {} (memory_size={}, sentence_size={})",
        vocab.len(),
        memory_size,
        sentence_size
    );

    // ── Vectorise ─────────────────────────────────────────────────────────────
    let vectorizer = Vectorizer::new(&vocab, sentence_size, memory_size);
    let train_all = vectorizer.vectorize_all(&splits.train);
    let test = vectorizer.vectorize_all(&splits.test);

    // ── Train / validation split ──────────────────────────────────────────────
    let (train_items, val_items) =
        split_train_val(train_all.items().to_vec(), cfg.val_fraction, rng);
    let train = train_all.with_items(train_items);
    let val = train_all.with_items(val_items);

    tracing::info!("Training Size: {}", train.len());
    tracing::info!("Validation Size: {}", val.len());
    tracing::info!("Testing Size: {}", test.len());

    Ok(PreparedTask { sets: TrainingSets { train, val, test }, vocab, stats })
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingReport> {
        let cfg = &self.config;

        // ── Step 1: Validate, reset log dir ──────────────────────────────────
        cfg.validate()?;
        let log_dir = LogDir::reset(&cfg.log_dir)?;
        log_dir.save_config(cfg)?;
        tracing::info!("Writing logs to '{}'", log_dir.root().display());

        let mut rng = cfg.rng();

        // ── Steps 2-5: Load, measure, vectorise, split ───────────────────────
        let loader = BabiLoader::new(&cfg.data_dir, cfg.only_supporting);
        let PreparedTask { sets, .. } = prepare_sets(cfg, &loader, &mut rng)?;

        // ── Step 6: Training loop (Layer 5) ──────────────────────────────────
        let writers = log_dir.summary_writers()?;
        let report = run_training(cfg, &sets, writers, &mut rng)?;

        // ── Step 7: Report ───────────────────────────────────────────────────
        log_dir.save_report(&report)?;
        Ok(report)
    }
}
