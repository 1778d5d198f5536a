use std::io::Read;

use failure::ResultExt;
use serde_derive::{Deserialize, Serialize};

use crate::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Tanh,
    Sigmoid,
    Relu,
    Identity,
}

impl Default for Activation {
    fn default() -> Self {
        Activation::Tanh
    }
}

impl Activation {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1. / (1. + (-x).exp()),
            Activation::Relu => x.max(0.),
            Activation::Identity => x,
        }
    }
}

/// Hyper-parameters of a frames extractor model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramesExtractorConfig {
    /// Size of the token encodings fed to the recurrent encoders
    pub token_encoding_size: usize,
    /// Size of the hidden layer of each direction of the recurrent encoders
    #[serde(default = "default_hidden_size")]
    pub hidden_size: usize,
    #[serde(default)]
    pub hidden_activation: Activation,
    /// Seed used to initialize the parameters of a new model
    #[serde(default)]
    pub seed: u64,
}

fn default_hidden_size() -> usize {
    100
}

impl FramesExtractorConfig {
    pub fn new(token_encoding_size: usize) -> Self {
        Self {
            token_encoding_size,
            hidden_size: default_hidden_size(),
            hidden_activation: Activation::default(),
            seed: 0,
        }
    }

    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    pub fn with_hidden_activation(mut self, activation: Activation) -> Self {
        self.hidden_activation = activation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)
            .with_context(|_| "Cannot deserialize frames extractor configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_encoding_size == 0 {
            return Err(FramesExtractorError::ModelConfiguration(
                "token_encoding_size must be greater than 0".to_string(),
            )
            .into());
        }
        if self.hidden_size == 0 {
            return Err(FramesExtractorError::ModelConfiguration(
                "hidden_size must be greater than 0".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
