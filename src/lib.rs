#![recursion_limit = "256"]

//! End-to-end memory networks (MemN2N) on the bAbI question answering tasks.
//!
//! Layers, top to bottom:
//!
//! * [`cli`]: clap commands
//! * [`application`]: the `train` and `inspect` workflows
//! * [`domain`]: example types and the `TaskSource` / `MemoryModel` seams
//! * [`data`]: task loading, vocabulary, vectorisation, batching
//! * [`ml`]: the Burn model, learner and training loop
//! * [`infra`]: accuracy, summaries and the run directory

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod ml;
