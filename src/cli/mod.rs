// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`   — trains a MemN2N on one bAbI task
//   2. `inspect` — prints what the data pipeline produces

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, TrainArgs};

use crate::application::{
    inspect_use_case::{InspectReport, InspectUseCase},
    train_use_case::TrainUseCase,
};

#[derive(Parser, Debug)]
#[command(
    name = "babi-memn2n",
    version,
    about = "Train end-to-end memory networks on the bAbI question answering tasks."
)]
pub struct Cli {
    /// The subcommand to run (train or inspect)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training on task {} in: {}", args.task_id, args.data_dir);

    let log_dir = args.log_dir.clone();
    let report = TrainUseCase::new(args.into()).execute()?;

    if let Some(best) = report.best_by_val() {
        println!(
            "Best validation accuracy {:.1}% at epoch {}",
            best.val_accuracy * 100.0,
            best.epoch
        );
    }
    println!("Testing Accuracy: {:.4}", report.final_test_accuracy);
    println!("Training complete. Logs saved to '{log_dir}'.");
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let report = InspectUseCase::new(args.into()).execute()?;
    print_inspect(&report);
    Ok(())
}

fn print_inspect(r: &InspectReport) {
    println!("Task {}", r.task_id);
    println!("  Longest sentence length: {}", r.stats.max_sentence_size);
    println!("  Longest story length:    {}", r.stats.max_story_size);
    println!("  Average story length:    {}", r.stats.mean_story_size);
    println!("  Longest query length:    {}", r.stats.max_query_size);
    println!("  Vocabulary size:         {}", r.vocab_size);
    println!("  Memory size:             {}", r.memory_size);
    println!("  Sentence size:           {}", r.sentence_size);
    println!("  Train stories:           {:?}", r.train_shape);
    println!("  Validation stories:      {:?}", r.val_shape);
    println!("  Test stories:            {:?}", r.test_shape);
    println!("\nFirst test example:");
    for sentence in &r.sample_story {
        println!("  {sentence}");
    }
    println!("  Q: {}", r.sample_query);
    println!("  A: {}", r.sample_answer);
}
