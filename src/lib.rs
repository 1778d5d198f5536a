pub mod configurations;
pub mod errors;
mod frames_extractor;
pub mod models;
pub mod nn;
pub mod ontology;
pub mod slot_layout;
mod text_frames_extractor;
mod tokenization;
pub mod tokens_encoder;
#[cfg(test)]
mod testutils;
mod utils;

pub const MODEL_VERSION: &str = "0.1.0";

pub use crate::configurations::{
    validate_configurations, Activation, FramesExtractorConfig, IntentConfiguration, NO_SLOT_NAME,
};
pub use crate::errors::*;
pub use crate::frames_extractor::{
    decode_intent, decode_slots, select_intent, FramesExtractor, FramesExtractorModel,
    FramesExtractorOutput,
};
pub use crate::ontology::{Distribution, Frame, Intent, Slot, SlotToken, Token};
pub use crate::slot_layout::{BioTag, SlotClass, SlotsLayout};
pub use crate::text_frames_extractor::TextFramesExtractor;
pub use crate::tokenization::tokenize;
pub use crate::tokens_encoder::{
    EmbeddingsEncoder, EmbeddingsMap, EnsembleTokensEncoder, TokensEncoder,
};
pub use crate::utils::{argmax, softmax, IntentName, SlotName};
