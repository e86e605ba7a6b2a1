// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the system works
// with: a student record, the exam difficulty category, and a
// fitted linear model.
//
// Rules for this layer:
//   - NO burn framework types
//   - NO file I/O or network calls
//   - Only structs, enums, traits and validation

// A single dataset row and its difficulty category
pub mod record;

// The fitted linear model (coefficients + intercept)
pub mod model;

// Abstractions the data and ml layers implement
pub mod traits;
