// ============================================================
// Layer 5 — Trainer
// ============================================================
// Two ways to fit the same linear model:
//
//   least_squares     closed-form OLS on centred data
//                     w = (XcᵀXc + λI)⁻¹ Xcᵀyc,   b = ȳ - x̄ᵀw
//
//   gradient_descent  full-batch Adam on MSE through burn's
//                     autodiff backend, on standardised inputs
//
// The three one-hot difficulty columns always sum to one, so
// XcᵀXc is singular once centred. λ is a vanishing ridge term
// (relative to the mean diagonal) that makes the system positive
// definite and selects the minimum-norm solution in the limit.

use anyhow::{bail, Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use ndarray::{s, Array1, Array2, Axis};

use crate::data::dataset::EncodedDataset;
use crate::domain::model::{LinearModel, Solver};
use crate::ml::model::{column_tensor, matrix_tensor, ScoreRegressor, ScoreRegressorConfig};

type TrainBackend = Autodiff<NdArray>;

const RIDGE_SCALE: f64 = 1e-9;
const LOG_EVERY: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    pub solver:        Solver,
    pub epochs:        usize,
    pub learning_rate: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self { solver: Solver::LeastSquares, epochs: 2000, learning_rate: 0.05 }
    }
}

/// Fit a linear model on `train`.
pub fn fit(train: &EncodedDataset, cfg: &FitConfig) -> Result<LinearModel> {
    if train.len() < 2 {
        bail!("Need at least 2 training rows to fit, got {}", train.len());
    }
    if train.n_features() == 0 {
        bail!("Cannot fit a model without features");
    }

    tracing::info!(
        "Fitting {} on {} rows x {} features",
        cfg.solver.as_str(),
        train.len(),
        train.n_features()
    );

    let (coefficients, intercept) = match cfg.solver {
        Solver::LeastSquares    => solve_least_squares(&train.features, &train.targets)?,
        Solver::GradientDescent => fit_gradient_descent(train, cfg)?,
    };

    tracing::info!("Fitted intercept={:.4} coefficients={:?}", intercept, coefficients);

    Ok(LinearModel {
        feature_names: train.feature_names.clone(),
        coefficients,
        intercept,
        solver:        cfg.solver,
        trained_rows:  train.len(),
    })
}

/// Rows as an `[n, d]` matrix.
fn design_matrix(rows: &[Vec<f64>], d: usize) -> Result<Array2<f64>> {
    if let Some(i) = rows.iter().position(|r| r.len() != d) {
        bail!("Row {} has {} values, expected {}", i, rows[i].len(), d);
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(Array2::from_shape_vec((rows.len(), d), flat)?)
}

/// Ordinary least squares with an intercept.
pub fn solve_least_squares(x: &[Vec<f64>], y: &[f64]) -> Result<(Vec<f64>, f64)> {
    if x.len() != y.len() || x.is_empty() {
        bail!("Feature rows ({}) and targets ({}) must be non-empty and equal in length", x.len(), y.len());
    }
    let d = x[0].len();
    let x = design_matrix(x, d)?;
    let y = Array1::from(y.to_vec());

    let x_mean = x.mean_axis(Axis(0)).context("No rows to average")?;
    let y_mean = y.mean().context("No targets to average")?;

    // centred normal equations
    let xc       = &x - &x_mean;
    let yc       = &y - y_mean;
    let mut gram = xc.t().dot(&xc);
    let rhs      = xc.t().dot(&yc);

    let trace = gram.diag().sum();
    let coefficients = if trace <= f64::EPSILON {
        // every feature constant: the best fit is the mean
        Array1::zeros(d)
    } else {
        let ridge = RIDGE_SCALE * trace / d as f64;
        gram.diag_mut().mapv_inplace(|v| v + ridge);
        cholesky_solve(&gram, &rhs).context("Normal equations are not positive definite")?
    };

    let intercept = y_mean - coefficients.dot(&x_mean);
    Ok((coefficients.to_vec(), intercept))
}

/// Solve A x = b for symmetric positive definite A.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let d = b.len();
    let mut l = Array2::<f64>::zeros((d, d));

    for i in 0..d {
        for j in 0..=i {
            let sum = l.row(i).slice(s![..j]).dot(&l.row(j).slice(s![..j]));
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // forward: L z = b
    let mut z = Array1::<f64>::zeros(d);
    for i in 0..d {
        let sum = l.row(i).slice(s![..i]).dot(&z.slice(s![..i]));
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // backward: Lᵀ x = z
    let mut x = Array1::<f64>::zeros(d);
    for i in (0..d).rev() {
        let sum = l.column(i).slice(s![i + 1..]).dot(&x.slice(s![i + 1..]));
        x[i] = (z[i] - sum) / l[[i, i]];
    }
    Some(x)
}

/// Adam on standardised features and a centred target, mapped back
/// to the original feature scale afterwards.
fn fit_gradient_descent(train: &EncodedDataset, cfg: &FitConfig) -> Result<(Vec<f64>, f64)> {
    if cfg.epochs == 0 {
        bail!("gradient_descent needs epochs > 0");
    }
    if cfg.learning_rate.is_nan() || cfg.learning_rate <= 0.0 {
        bail!("learning_rate must be positive, got {}", cfg.learning_rate);
    }

    let d = train.n_features();
    let x = design_matrix(&train.features, d)?;
    let y = Array1::from(train.targets.clone());

    let x_mean = x.mean_axis(Axis(0)).context("No rows to average")?;
    // constant columns keep unit scale
    let x_std  = x
        .var_axis(Axis(0), 0.0)
        .mapv(|var| if var > f64::EPSILON { var.sqrt() } else { 1.0 });
    let y_mean = y.mean().context("No targets to average")?;

    let scaled  = (&x - &x_mean) / &x_std;
    let centred = &y - y_mean;

    let device = NdArrayDevice::default();
    let x = matrix_tensor::<TrainBackend>(&scaled, &device);
    let y = column_tensor::<TrainBackend>(&centred, &device);

    let mut model: ScoreRegressor<TrainBackend> = ScoreRegressorConfig::new(d).init(&device);
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    for epoch in 1..=cfg.epochs {
        let loss = model.forward_loss(x.clone(), y.clone());

        if epoch == 1 || epoch % LOG_EVERY == 0 || epoch == cfg.epochs {
            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            tracing::info!("Epoch {:>5}/{} | mse={:.4}", epoch, cfg.epochs, loss_val);
        }

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(cfg.learning_rate, model, grads);
    }

    let (w_scaled, b_scaled) = model.parameters()?;
    let coefficients = Array1::from(w_scaled) / &x_std;
    let intercept    = y_mean + b_scaled - coefficients.dot(&x_mean);

    Ok((coefficients.to_vec(), intercept))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// score = 30 + 5h + {Easy: +10, Medium: 0, Hard: -10}
    fn synthetic() -> EncodedDataset {
        let mut features = Vec::new();
        let mut targets  = Vec::new();
        for i in 0..30 {
            let hours = (i % 10) as f64 + 0.5;
            let (onehot, offset) = match i % 3 {
                0 => ([1.0, 0.0, 0.0], 10.0),
                1 => ([0.0, 1.0, 0.0], 0.0),
                _ => ([0.0, 0.0, 1.0], -10.0),
            };
            features.push(vec![hours, onehot[0], onehot[1], onehot[2]]);
            targets.push(30.0 + 5.0 * hours + offset);
        }
        EncodedDataset::new(
            vec![
                "hours_studied".into(),
                "difficulty_Easy".into(),
                "difficulty_Medium".into(),
                "difficulty_Hard".into(),
            ],
            features,
            targets,
        )
    }

    #[test]
    fn test_least_squares_recovers_simple_line() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| 10.0 + 5.0 * i as f64).collect();
        let (w, b) = solve_least_squares(&x, &y).unwrap();
        assert!((w[0] - 5.0).abs() < 1e-6);
        assert!((b - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_least_squares_handles_collinear_one_hot() {
        let ds    = synthetic();
        let model = fit(&ds, &FitConfig::default()).unwrap();

        // minimum-norm split of the difficulty offsets
        assert!((model.coefficients[0] - 5.0).abs() < 1e-4);
        assert!((model.coefficients[1] - 10.0).abs() < 1e-4);
        assert!(model.coefficients[2].abs() < 1e-4);
        assert!((model.coefficients[3] + 10.0).abs() < 1e-4);
        assert!((model.intercept - 30.0).abs() < 1e-4);

        for (row, y) in ds.features.iter().zip(&ds.targets) {
            assert!((model.predict_row(row) - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_constant_features_predict_mean() {
        let x = vec![vec![1.0], vec![1.0], vec![1.0]];
        let y = vec![10.0, 20.0, 30.0];
        let (w, b) = solve_least_squares(&x, &y).unwrap();
        assert_eq!(w, vec![0.0]);
        assert!((b - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_least_squares_rejects_ragged_rows() {
        let x = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(solve_least_squares(&x, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_fit_rejects_tiny_dataset() {
        let ds = EncodedDataset::new(vec!["x".into()], vec![vec![1.0]], vec![1.0]);
        assert!(fit(&ds, &FitConfig::default()).is_err());
    }

    #[test]
    fn test_fit_records_metadata() {
        let ds    = synthetic();
        let model = fit(&ds, &FitConfig::default()).unwrap();
        assert_eq!(model.feature_names, ds.feature_names);
        assert_eq!(model.trained_rows, 30);
        assert_eq!(model.solver, Solver::LeastSquares);
    }

    #[test]
    fn test_gradient_descent_approaches_least_squares() {
        let ds  = synthetic();
        let cfg = FitConfig { solver: Solver::GradientDescent, epochs: 3000, learning_rate: 0.05 };
        let model = fit(&ds, &cfg).unwrap();

        let variance = {
            let mean = ds.targets.iter().sum::<f64>() / ds.len() as f64;
            ds.targets.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / ds.len() as f64
        };
        let mse = ds
            .features
            .iter()
            .zip(&ds.targets)
            .map(|(row, y)| (model.predict_row(row) - y).powi(2))
            .sum::<f64>()
            / ds.len() as f64;

        assert_eq!(model.solver, Solver::GradientDescent);
        assert!(mse < 0.05 * variance, "mse={mse} variance={variance}");
    }
}
