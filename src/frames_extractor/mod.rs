mod decoding;
mod model;

use std::sync::Arc;

use log::debug;
use ndarray::prelude::*;

pub use self::decoding::{decode_intent, decode_slots, select_intent};
pub use self::model::FramesExtractorModel;
use crate::errors::*;
use crate::ontology::{Distribution, Frame, Intent};
use crate::utils::concatenate;

/// Extracts frames from sentences, given the encodings of their tokens.
///
/// The extractor only reads its model, which can be shared between several extractors.
#[derive(Debug, Clone)]
pub struct FramesExtractor {
    model: Arc<FramesExtractorModel>,
}

/// Raw output of a [`FramesExtractor`] over a sentence
#[derive(Debug, Clone)]
pub struct FramesExtractorOutput {
    model: Arc<FramesExtractorModel>,
    /// Probability of each intent, following the order of the intents configuration
    pub intents_distribution: Array1<f32>,
    /// For each token, the probability of each class of the slots classification
    pub slots_classifications: Vec<Array1<f32>>,
}

impl FramesExtractor {
    pub fn new(model: Arc<FramesExtractorModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<FramesExtractorModel> {
        &self.model
    }

    /// Runs the networks over the encodings of the tokens of a sentence.
    ///
    /// The sentence must contain at least one token, and each encoding must have the token
    /// encoding size of the model.
    pub fn extract_frames(
        &self,
        tokens_encodings: &[Array1<f32>],
    ) -> Result<FramesExtractorOutput> {
        debug!(
            "Extracting frames from {} tokens with model '{}'...",
            tokens_encodings.len(),
            self.model.name()
        );
        let model = &*self.model;
        let encoding_1 = model.bi_rnn_1().encode(tokens_encodings)?;
        let encoding_2 = model.bi_rnn_2().encode(tokens_encodings)?;

        let summaries = concatenate(&[encoding_1.summary.view(), encoding_2.summary.view()])?;
        let intents_distribution = model.intent_network().forward(summaries.view())?;

        let mut slots_classifications: Vec<Array1<f32>> =
            Vec::with_capacity(tokens_encodings.len());
        let mut previous_classification = Array1::<f32>::zeros(model.layout().output_size());
        for (token_1, token_2) in encoding_1.tokens.iter().zip(encoding_2.tokens.iter()) {
            let features = concatenate(&[
                previous_classification.view(),
                token_1.view(),
                token_2.view(),
            ])?;
            let classification = model.slots_network().forward(features.view())?;
            previous_classification = classification.clone();
            slots_classifications.push(classification);
        }

        Ok(FramesExtractorOutput {
            model: self.model.clone(),
            intents_distribution,
            slots_classifications,
        })
    }
}

impl FramesExtractorOutput {
    pub fn build_intent(&self) -> Result<Intent> {
        let intent = decode_intent(
            self.model.layout(),
            self.model.intents_configuration(),
            self.intents_distribution.view(),
            &self.slots_classifications,
        )?;
        debug!(
            "Intent found: '{}' ({}), {} slots extracted",
            intent.name,
            intent.score,
            intent.slots.len()
        );
        Ok(intent)
    }

    pub fn build_distribution(&self) -> Distribution {
        Distribution {
            map: self
                .model
                .intents_configuration()
                .iter()
                .zip(self.intents_distribution.iter())
                .map(|(configuration, probability)| {
                    (configuration.name().to_string(), *probability)
                })
                .collect(),
        }
    }

    pub fn build_frame(&self) -> Result<Frame> {
        Ok(Frame {
            intent: self.build_intent()?,
            distribution: self.build_distribution(),
        })
    }
}
