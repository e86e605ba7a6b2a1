// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All burn-specific code lives here and in infra::checkpoint.
//
//   model.rs      — ScoreRegressor: a single Linear layer module,
//                   plus tensor builders for row data
//
//   trainer.rs    — fit(): closed-form least squares, or
//                   full-batch Adam through burn autodiff
//
//   inferencer.rs — Predictor: validated, clamped single-row
//                   predictions and raw batch predictions

/// Linear regression as a burn module
pub mod model;

/// Solvers that produce a fitted LinearModel
pub mod trainer;

/// Prediction over a loaded model
pub mod inferencer;
