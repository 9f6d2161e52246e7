// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw bAbI task files to tensor batches.
//
//   qa{id}_*_train.txt / qa{id}_*_test.txt
//       │
//       ▼
//   BabiLoader        → finds the task files, reads them
//       │
//       ▼
//   StoryParser       → lines → QaExamples (story, query, answer)
//       │
//       ▼
//   CorpusStats       → sentence_size, memory_size
//   Vocabulary        → word ids + time tokens
//       │
//       ▼
//   Vectorizer        → fixed-shape integer arrays
//       │
//       ▼
//   split_train_val   → train / validation
//       │
//       ▼
//   batch_ranges +
//   MemBatcher        → tensor batches for the model
//
// Each module is responsible for exactly one step.

/// Finds and reads bAbI task files
pub mod loader;

/// Tokenises and parses task files into examples
pub mod preprocessor;

/// Corpus-wide size statistics
pub mod stats;

/// Word → index mapping with time tokens
pub mod vocabulary;

/// Fixed-shape encoding of examples
pub mod vectorizer;

/// Vectorised split container
pub mod dataset;

/// Seeded train/validation split
pub mod splitter;

/// Batch ranges and the Burn Batcher
pub mod batcher;
