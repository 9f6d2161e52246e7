// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `inspect`,
// and all their configurable flags.

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::ml::trainer::BackendKind;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train an end-to-end memory network on one bAbI task
    Train(TrainArgs),

    /// Print corpus statistics and a decoded example, without training
    Inspect(InspectArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Base learning rate for SGD
    #[arg(long, default_value_t = 0.01)]
    pub learning_rate: f64,

    /// Halve the learning rate every this many epochs
    #[arg(long, default_value_t = 10)]
    pub anneal_rate: usize,

    /// Stop annealing after this epoch
    #[arg(long, default_value_t = 100)]
    pub anneal_stop_epoch: usize,

    /// Clip gradients to this norm
    #[arg(long, default_value_t = 40.0)]
    pub max_grad_norm: f64,

    /// Evaluate train/val/test accuracy every this many epochs
    #[arg(long, default_value_t = 10)]
    pub evaluation_interval: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Number of memory hops
    #[arg(long, default_value_t = 3)]
    pub hops: usize,

    #[arg(long, default_value_t = 250)]
    pub epochs: usize,

    #[arg(long, default_value_t = 30)]
    pub embedding_size: usize,

    /// Maximum number of sentences kept in memory
    #[arg(long, default_value_t = 50)]
    pub memory_size: usize,

    /// bAbI task id, 1 to 20
    #[arg(long, default_value_t = 2)]
    pub task_id: usize,

    /// Seed for the split, the batch order and the backend
    #[arg(long)]
    pub random_state: Option<u64>,

    /// Directory with the qa*_train.txt / qa*_test.txt files
    #[arg(long, default_value = "data/babi-tasks-v1-2/tasks_1-20_v1-2/en-10k")]
    pub data_dir: String,

    /// Directory for summaries and the run report (wiped on start)
    #[arg(long, default_value = "logs")]
    pub log_dir: String,

    /// Fraction of the training set held out for validation
    #[arg(long, default_value_t = 0.1)]
    pub val_fraction: f64,

    /// Keep only the supporting facts of each question as its story
    #[arg(long)]
    pub only_supporting: bool,

    /// wgpu or ndarray
    #[arg(long, default_value_t = BackendKind::Wgpu)]
    pub backend: BackendKind,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            learning_rate:       a.learning_rate,
            anneal_rate:         a.anneal_rate,
            anneal_stop_epoch:   a.anneal_stop_epoch,
            max_grad_norm:       a.max_grad_norm,
            evaluation_interval: a.evaluation_interval,
            batch_size:          a.batch_size,
            hops:                a.hops,
            epochs:              a.epochs,
            embedding_size:      a.embedding_size,
            memory_size:         a.memory_size,
            task_id:             a.task_id,
            random_state:        a.random_state,
            data_dir:            a.data_dir,
            log_dir:             a.log_dir,
            val_fraction:        a.val_fraction,
            only_supporting:     a.only_supporting,
            backend:             a.backend,
        }
    }
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(long, default_value_t = 2)]
    pub task_id: usize,

    #[arg(long, default_value = "data/babi-tasks-v1-2/tasks_1-20_v1-2/en-10k")]
    pub data_dir: String,

    #[arg(long, default_value_t = 50)]
    pub memory_size: usize,

    #[arg(long)]
    pub only_supporting: bool,
}

impl From<InspectArgs> for TrainConfig {
    fn from(a: InspectArgs) -> Self {
        TrainConfig {
            task_id:         a.task_id,
            data_dir:        a.data_dir,
            memory_size:     a.memory_size,
            only_supporting: a.only_supporting,
            ..TrainConfig::default()
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["babi-memn2n", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(TrainConfig::from(args), TrainConfig::default());
    }

    #[test]
    fn test_train_flags() {
        let cli = Cli::try_parse_from([
            "babi-memn2n",
            "train",
            "--task-id",
            "1",
            "--random-state",
            "42",
            "--backend",
            "ndarray",
            "--only-supporting",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.task_id, 1);
        assert_eq!(cfg.random_state, Some(42));
        assert_eq!(cfg.backend, BackendKind::Ndarray);
        assert!(cfg.only_supporting);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["babi-memn2n", "train", "--backend", "cuda"]).is_err());
    }

    #[test]
    fn test_inspect_args() {
        let cli = Cli::try_parse_from(["babi-memn2n", "inspect", "--task-id", "5"]).unwrap();
        let Commands::Inspect(args) = cli.command else { panic!("expected inspect") };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.task_id, 5);
        assert_eq!(cfg.memory_size, 50);
        assert_eq!(cfg.data_dir, "data/babi-tasks-v1-2/tasks_1-20_v1-2/en-10k");
    }

    #[test]
    fn test_default_data_dir_is_the_babi_download_layout() {
        let cli = Cli::try_parse_from(["babi-memn2n", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(args.data_dir, "data/babi-tasks-v1-2/tasks_1-20_v1-2/en-10k");
    }
}
