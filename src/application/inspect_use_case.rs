// ============================================================
// Layer 2 — Inspect Use Case
// ============================================================
// Loads and encodes a task without training, so the data side
// of a run can be checked on its own:
//
//   corpus statistics → vocabulary → set shapes
//   → first test example decoded back to text

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};

use crate::application::train_use_case::{prepare_sets, PreparedTask, TrainConfig};
use crate::data::{loader::BabiLoader, stats::CorpusStats};
use crate::domain::traits::TaskSource;

/// What `inspect` reports about a task.
#[derive(Debug, Clone)]
pub struct InspectReport {
    pub task_id:       usize,
    pub stats:         CorpusStats,
    pub vocab_size:    usize,
    pub memory_size:   usize,
    pub sentence_size: usize,
    pub train_shape:   [usize; 3],
    pub val_shape:     [usize; 3],
    pub test_shape:    [usize; 3],
    /// Non-empty memory rows of the first test story, oldest first
    pub sample_story:  Vec<String>,
    pub sample_query:  String,
    pub sample_answer: String,
}

pub struct InspectUseCase {
    config: TrainConfig,
}

impl InspectUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<InspectReport> {
        let loader = BabiLoader::new(&self.config.data_dir, self.config.only_supporting);
        self.inspect(&loader)
    }

    pub fn inspect<S: TaskSource>(&self, source: &S) -> Result<InspectReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // Fixed seed: inspect output should not change between calls
        let PreparedTask { sets, vocab, stats } =
            prepare_sets(cfg, source, &mut StdRng::seed_from_u64(0))?;

        let sample = sets
            .test
            .items()
            .first()
            .with_context(|| format!("Task {} has no test examples", cfg.task_id))?;

        let sentence_size = sets.test.sentence_size();
        let sample_story = sample
            .story
            .chunks(sentence_size.max(1))
            .map(|row| vocab.decode(row))
            .filter(|row| !row.is_empty())
            .collect();

        Ok(InspectReport {
            task_id: cfg.task_id,
            stats,
            vocab_size: vocab.len(),
            memory_size: sets.test.memory_size(),
            sentence_size,
            train_shape: sets.train.story_shape(),
            val_shape: sets.val.story_shape(),
            test_shape: sets.test.story_shape(),
            sample_story,
            sample_query: vocab.decode(&sample.query),
            sample_answer: vocab.token(sample.label).unwrap_or("<nil>").to_string(),
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::domain::{example::QaExample, traits::TaskSplits};

    struct FixedTask(TaskSplits);

    impl TaskSource for FixedTask {
        fn load_task(&self, _task_id: usize) -> Result<TaskSplits> {
            Ok(self.0.clone())
        }
    }

    /// Counts how often the task is read.
    struct CountingTask {
        splits: TaskSplits,
        loads:  Cell<usize>,
    }

    impl TaskSource for CountingTask {
        fn load_task(&self, _task_id: usize) -> Result<TaskSplits> {
            self.loads.set(self.loads.get() + 1);
            Ok(self.splits.clone())
        }
    }

    fn ex(story: &[&str], query: &str, answer: &str) -> QaExample {
        let words = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();
        QaExample::new(story.iter().map(|s| words(s)).collect(), words(query), answer)
    }

    #[test]
    fn test_inspect_decodes_first_test_story() {
        let task = FixedTask(TaskSplits {
            train: vec![ex(&["mary went home", "john went out"], "where is mary", "home")],
            test: vec![ex(&["john went home"], "where is john", "home")],
        });
        let cfg = TrainConfig { val_fraction: 0.0, ..TrainConfig::default() };

        let report = InspectUseCase::new(cfg).inspect(&task).unwrap();
        assert_eq!(report.memory_size, 2);
        assert_eq!(report.sentence_size, 4);
        assert_eq!(report.train_shape, [1, 2, 4]);
        assert_eq!(report.val_shape, [0, 2, 4]);
        // The single sentence is the most recent one, tagged time1
        assert_eq!(report.sample_story, vec!["john went home time1".to_string()]);
        assert_eq!(report.sample_query, "where is john");
        assert_eq!(report.sample_answer, "home");
    }

    #[test]
    fn test_inspect_needs_a_test_example() {
        let task = FixedTask(TaskSplits {
            train: vec![ex(&["mary went home"], "where is mary", "home")],
            test: vec![],
        });
        let err = InspectUseCase::new(TrainConfig::default()).inspect(&task).unwrap_err();
        assert!(err.to_string().contains("no test examples"));
    }

    #[test]
    fn test_inspect_reads_the_task_once() {
        let task = CountingTask {
            splits: TaskSplits {
                train: vec![ex(&["mary went home"], "where is mary", "home")],
                test: vec![ex(&["john went out"], "where is john", "out")],
            },
            loads: Cell::new(0),
        };
        let report = InspectUseCase::new(TrainConfig::default()).inspect(&task).unwrap();
        assert_eq!(task.loads.get(), 1);
        assert_eq!(report.stats.max_story_size, 1);
    }
}
