use failure::format_err;
use ndarray::prelude::*;

use crate::configurations::Activation;
use crate::errors::*;
use crate::utils::concatenate;

/// A simple recurrent layer computing `h_t = act(W x_t + U h_(t-1) + b)`
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentLayer {
    /// shape (h, i)
    input_weights: Array2<f32>,
    /// shape (h, h)
    recurrent_weights: Array2<f32>,
    biases: Array1<f32>,
    activation: Activation,
}

impl RecurrentLayer {
    pub fn new(
        input_weights: Array2<f32>,
        recurrent_weights: Array2<f32>,
        biases: Array1<f32>,
        activation: Activation,
    ) -> Result<Self> {
        let hidden_size = biases.dim();
        if input_weights.dim().0 != hidden_size
            || recurrent_weights.dim() != (hidden_size, hidden_size)
        {
            return Err(format_err!(
                "Recurrent layer weights {:?} and {:?} do not match hidden size {}",
                input_weights.dim(),
                recurrent_weights.dim(),
                hidden_size
            ));
        }
        Ok(Self {
            input_weights,
            recurrent_weights,
            biases,
            activation,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_weights.dim().1
    }

    pub fn hidden_size(&self) -> usize {
        self.biases.dim()
    }

    pub fn input_weights(&self) -> &Array2<f32> {
        &self.input_weights
    }

    pub fn recurrent_weights(&self) -> &Array2<f32> {
        &self.recurrent_weights
    }

    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Runs the layer over the sequence in the given order and returns the hidden state
    /// computed at each step.
    fn run<'a, I>(&self, sequence: I) -> Vec<Array1<f32>>
    where
        I: Iterator<Item = &'a Array1<f32>>,
    {
        let mut previous = Array1::<f32>::zeros(self.hidden_size());
        sequence
            .map(|input| {
                let mut state = self.input_weights.dot(input)
                    + self.recurrent_weights.dot(&previous)
                    + &self.biases;
                let activation = self.activation;
                state.mapv_inplace(|v| activation.apply(v));
                previous = state.clone();
                state
            })
            .collect()
    }
}

/// Output of a [`BiRnn`] over a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct BiRnnEncoding {
    /// Concatenation of the left-to-right and right-to-left states, for each token
    pub tokens: Vec<Array1<f32>>,
    /// Concatenation of the last left-to-right state and the last right-to-left state
    pub summary: Array1<f32>,
}

/// A bidirectional recurrent encoder
#[derive(Debug, Clone, PartialEq)]
pub struct BiRnn {
    left_to_right: RecurrentLayer,
    right_to_left: RecurrentLayer,
}

impl BiRnn {
    pub fn new(left_to_right: RecurrentLayer, right_to_left: RecurrentLayer) -> Result<Self> {
        if left_to_right.input_size() != right_to_left.input_size()
            || left_to_right.hidden_size() != right_to_left.hidden_size()
        {
            return Err(format_err!(
                "BiRNN layers must share the same input and hidden sizes"
            ));
        }
        Ok(Self {
            left_to_right,
            right_to_left,
        })
    }

    pub fn left_to_right(&self) -> &RecurrentLayer {
        &self.left_to_right
    }

    pub fn right_to_left(&self) -> &RecurrentLayer {
        &self.right_to_left
    }

    pub fn input_size(&self) -> usize {
        self.left_to_right.input_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.left_to_right.hidden_size()
    }

    /// Size of each token output, as well as of the summary
    pub fn output_size(&self) -> usize {
        2 * self.hidden_size()
    }

    pub fn encode(&self, sequence: &[Array1<f32>]) -> Result<BiRnnEncoding> {
        if sequence.is_empty() {
            return Err(FramesExtractorError::InvalidInput(
                "cannot encode an empty sequence".to_string(),
            )
            .into());
        }
        if let Some(encoding) = sequence.iter().find(|e| e.dim() != self.input_size()) {
            return Err(FramesExtractorError::InvalidInput(format!(
                "expected token encodings of size {} but found {}",
                self.input_size(),
                encoding.dim()
            ))
            .into());
        }

        let left_to_right_states = self.left_to_right.run(sequence.iter());
        let mut right_to_left_states = self.right_to_left.run(sequence.iter().rev());
        right_to_left_states.reverse();

        let tokens = left_to_right_states
            .iter()
            .zip(right_to_left_states.iter())
            .map(|(l2r, r2l)| concatenate(&[l2r.view(), r2l.view()]))
            .collect::<Result<Vec<_>>>()?;
        let summary = concatenate(&[
            left_to_right_states[sequence.len() - 1].view(),
            right_to_left_states[0].view(),
        ])?;

        Ok(BiRnnEncoding { tokens, summary })
    }
}
