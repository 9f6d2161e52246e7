// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application only ever talks to these two seams:
//
//   TaskSource   — something that yields the train/test
//                  examples of one bAbI task
//   MemoryModel  — something that can be fitted on a batch
//                  and asked for predicted answer labels
//
// The Burn MemN2N learner implements MemoryModel; the training
// loop is generic over it, so the loop can be exercised with a
// scripted model in tests.

use anyhow::Result;

use crate::domain::example::{QaExample, VectorizedItem};

/// The raw train and test examples of one task.
#[derive(Debug, Clone, Default)]
pub struct TaskSplits {
    pub train: Vec<QaExample>,
    pub test:  Vec<QaExample>,
}

impl TaskSplits {
    /// Train followed by test, the corpus the vocabulary is built from
    pub fn all(&self) -> impl Iterator<Item = &QaExample> {
        self.train.iter().chain(self.test.iter())
    }
}

// ─── TaskSource ───────────────────────────────────────────────────────────────
/// Any component that can load the examples of a bAbI task.
pub trait TaskSource {
    /// Load the train and test examples for `task_id` (1..=20).
    fn load_task(&self, task_id: usize) -> Result<TaskSplits>;
}

// ─── MemoryModel ──────────────────────────────────────────────────────────────
/// A trainable question-answering model.
///
/// The training loop never touches the parameters directly; it only
/// calls these two methods, one after the other.
pub trait MemoryModel {
    /// Run one gradient step on `batch` and return the batch cost.
    fn batch_fit(&mut self, batch: &[VectorizedItem], learning_rate: f64) -> Result<f64>;

    /// Predict an answer label for every item, without updating parameters.
    fn predict(&self, items: &[VectorizedItem]) -> Result<Vec<usize>>;
}
