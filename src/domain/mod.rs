// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing the core concepts:
// a bAbI example (story, question, answer), its vectorised
// form, and the two seams the rest of the system is built on.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// Story / question / answer examples and their encoded form
pub mod example;

// Core abstractions (traits) that other layers implement
pub mod traits;
