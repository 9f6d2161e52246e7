// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model and optimiser code lives here. The data layer
// only touches Burn through its Batcher.
//
//   model.rs    — the MemN2N module
//                 • hops + 1 embedding tables, adjacent tying
//                 • position encoding, nil masking
//                 • summed softmax cross-entropy
//
//   learner.rs  — MemN2NLearner: model + SGD + gradient
//                 clipping behind the MemoryModel trait
//
//   trainer.rs  — learning-rate annealing, the epoch loop,
//                 periodic evaluation, backend selection

/// End-to-end memory network architecture
pub mod model;

/// Model + optimiser, exposed as a MemoryModel
pub mod learner;

/// Training loop with annealing and evaluation
pub mod trainer;
