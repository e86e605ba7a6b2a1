use anyhow::{anyhow, Result};
use burn::{
    module::Param,
    nn::{
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    prelude::*,
};
use ndarray::{Array1, Array2};

use crate::domain::model::LinearModel;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct ScoreRegressorConfig {
    pub n_features: usize,
}

impl ScoreRegressorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ScoreRegressor<B> {
        let linear = LinearConfig::new(self.n_features, 1)
            .with_bias(true)
            .init(device);
        ScoreRegressor { linear }
    }
}

/// One dense layer, `n_features → 1`: exactly a linear regression.
#[derive(Module, Debug)]
pub struct ScoreRegressor<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> ScoreRegressor<B> {
    /// x: [rows, n_features] → [rows, 1]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(x)
    }

    /// Mean squared error against targets of shape [rows, 1].
    pub fn forward_loss(&self, x: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
        let predictions = self.forward(x);
        MseLoss::new().forward(predictions, targets, Reduction::Mean)
    }

    /// Build a module holding already-fitted parameters.
    pub fn from_linear_model(model: &LinearModel, device: &B::Device) -> Self {
        let d = model.n_features();

        // burn stores Linear weights as [d_input, d_output]
        let weight = Tensor::<B, 2>::from_data(TensorData::new(model.coefficients.clone(), [d, 1]), device);
        let bias   = Tensor::<B, 1>::from_data(TensorData::new(vec![model.intercept], [1]), device);

        let mut linear = LinearConfig::new(d, 1).init(device);
        linear.weight  = Param::from_tensor(weight);
        linear.bias    = Some(Param::from_tensor(bias));
        Self { linear }
    }

    /// Read back (coefficients, intercept).
    pub fn parameters(&self) -> Result<(Vec<f64>, f64)> {
        let weights = tensor_to_vec(self.linear.weight.val())?;
        let intercept = match &self.linear.bias {
            Some(bias) => tensor_to_vec(bias.val())?.first().copied().unwrap_or(0.0),
            None => 0.0,
        };
        Ok((weights, intercept))
    }
}

fn tensor_to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f64>> {
    // widen to f64 whatever the backend's float type is
    tensor
        .into_data()
        .convert::<f64>()
        .to_vec::<f64>()
        .map_err(|e| anyhow!("Cannot read tensor data: {e:?}"))
}

/// [rows, cols] tensor from a matrix, in row-major order.
pub fn matrix_tensor<B: Backend>(x: &Array2<f64>, device: &B::Device) -> Tensor<B, 2> {
    let (rows, cols) = x.dim();
    let flat: Vec<f64> = x.iter().copied().collect();
    Tensor::from_data(TensorData::new(flat, [rows, cols]), device)
}

/// Column [rows, 1] tensor.
pub fn column_tensor<B: Backend>(values: &Array1<f64>, device: &B::Device) -> Tensor<B, 2> {
    Tensor::from_data(TensorData::new(values.to_vec(), [values.len(), 1]), device)
}
