// ============================================================
// Layer 4 — bAbI Task Loader
// ============================================================
// Finds and parses the train/test files of one bAbI task.
//
// The bAbI distribution ships one pair of files per task:
//
//   en-10k/
//     qa1_single-supporting-fact_train.txt
//     qa1_single-supporting-fact_test.txt
//     qa2_two-supporting-facts_train.txt
//     ...
//
// Files are matched by the "qa{id}_" prefix, so task 1 never
// picks up qa10_ / qa11_ files.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::preprocessor::StoryParser;
use crate::domain::example::QaExample;
use crate::domain::traits::{TaskSource, TaskSplits};

/// Loads bAbI tasks from a directory.
/// Implements the TaskSource trait from Layer 3.
pub struct BabiLoader {
    /// Directory containing the qa*_train.txt / qa*_test.txt files
    dir: PathBuf,
    parser: StoryParser,
}

impl BabiLoader {
    pub fn new(dir: impl Into<PathBuf>, only_supporting: bool) -> Self {
        Self {
            dir: dir.into(),
            parser: StoryParser::new(only_supporting),
        }
    }

    /// Return the (train, test) file paths for a task.
    pub fn task_files(&self, task_id: usize) -> Result<(PathBuf, PathBuf)> {
        let mut names: Vec<String> = fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read data directory '{}'", self.dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().map(String::from))
            .collect();
        names.sort();

        let prefix = format!("qa{task_id}_");
        let find = |split: &str| {
            names
                .iter()
                .find(|name| name.contains(&prefix) && name.contains(split))
                .map(|name| self.dir.join(name))
                .with_context(|| {
                    format!(
                        "No {} file for task {} in '{}'",
                        split,
                        task_id,
                        self.dir.display()
                    )
                })
        };

        Ok((find("train")?, find("test")?))
    }

    fn load_file(&self, path: &Path) -> Result<Vec<QaExample>> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        let examples = self
            .parser
            .parse(&text)
            .with_context(|| format!("Cannot parse '{}'", path.display()))?;

        tracing::debug!("Parsed {} examples from '{}'", examples.len(), path.display());
        Ok(examples)
    }
}

impl TaskSource for BabiLoader {
    fn load_task(&self, task_id: usize) -> Result<TaskSplits> {
        let (train_path, test_path) = self.task_files(task_id)?;
        tracing::info!(
            "Loading task {} from '{}' and '{}'",
            task_id,
            train_path.display(),
            test_path.display()
        );

        Ok(TaskSplits {
            train: self.load_file(&train_path)?,
            test:  self.load_file(&test_path)?,
        })
    }
}
