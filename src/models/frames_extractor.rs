use serde_derive::{Deserialize, Serialize};

use crate::configurations::{FramesExtractorConfig, IntentConfiguration};

#[derive(Debug, Serialize, Deserialize)]
pub struct FramesExtractorModelData {
    pub model_version: String,
    pub name: String,
    pub config: FramesExtractorConfig,
    pub intents_configuration: Vec<IntentConfiguration>,
    pub bi_rnn_1: BiRnnData,
    pub bi_rnn_2: BiRnnData,
    pub intent_network: FeedforwardData,
    pub slots_network: FeedforwardData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BiRnnData {
    pub left_to_right: RecurrentLayerData,
    pub right_to_left: RecurrentLayerData,
}

/// Matrices are stored row by row
#[derive(Debug, Serialize, Deserialize)]
pub struct RecurrentLayerData {
    pub input_weights: Vec<Vec<f32>>,
    pub recurrent_weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedforwardData {
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
}
