use failure::format_err;
use ndarray::prelude::*;

use crate::errors::*;
use crate::utils::softmax;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputActivation {
    Softmax,
}

/// A dense layer followed by an activation over its whole output
#[derive(Debug, Clone, PartialEq)]
pub struct FeedforwardLayer {
    /// matrix with shape (o, i)
    /// ------------------------
    ///
    /// - o = output size
    /// - i = input size
    weights: Array2<f32>,
    biases: Array1<f32>,
    activation: OutputActivation,
}

impl FeedforwardLayer {
    pub fn new(
        weights: Array2<f32>,
        biases: Array1<f32>,
        activation: OutputActivation,
    ) -> Result<Self> {
        if weights.dim().0 != biases.dim() {
            return Err(format_err!(
                "Feedforward layer has {} output rows but {} biases",
                weights.dim().0,
                biases.dim()
            ));
        }
        Ok(Self {
            weights,
            biases,
            activation,
        })
    }

    pub fn input_size(&self) -> usize {
        self.weights.dim().1
    }

    pub fn output_size(&self) -> usize {
        self.weights.dim().0
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    pub fn forward(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        if input.dim() != self.input_size() {
            return Err(FramesExtractorError::InvalidInput(format!(
                "expected a feedforward input of size {} but found {}",
                self.input_size(),
                input.dim()
            ))
            .into());
        }
        let scores = self.weights.dot(&input) + &self.biases;
        Ok(match self.activation {
            OutputActivation::Softmax => softmax(&scores),
        })
    }
}
