// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the training pipeline:
//
//   metrics.rs  — accuracy, per-epoch metrics, the final
//                 training report and the per-split summary
//                 CSV writers
//
//   log_dir.rs  — the run's log directory: reset at start,
//                 config.json snapshot, report.json

/// Accuracy, training report and summary CSV writers
pub mod metrics;

/// Log directory layout and JSON snapshots
pub mod log_dir;
