// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several layers:
//
//   config.rs      — YAML run configuration with defaults
//
//   checkpoint.rs  — Saving and loading the fitted model.
//                    Weights go through burn's file recorder,
//                    feature order and provenance through JSON.
//
//   metrics.rs     — MAE / RMSE / R² and a CSV run log

/// YAML configuration
pub mod config;

/// Model artifact persistence
pub mod checkpoint;

/// Regression metrics and CSV logging
pub mod metrics;
