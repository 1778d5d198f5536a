use std::sync::Arc;

use failure::format_err;

use crate::errors::*;
use crate::frames_extractor::{FramesExtractor, FramesExtractorModel};
use crate::ontology::{Frame, Token};
use crate::tokens_encoder::TokensEncoder;

/// Extracts frames from tokenized sentences, encoding their tokens with its own encoder.
pub struct TextFramesExtractor {
    tokens_encoder: Box<dyn TokensEncoder>,
    frames_extractor: FramesExtractor,
}

impl TextFramesExtractor {
    pub fn new(
        model: Arc<FramesExtractorModel>,
        tokens_encoder: Box<dyn TokensEncoder>,
    ) -> Result<Self> {
        if tokens_encoder.encoding_size() != model.token_encoding_size() {
            return Err(FramesExtractorError::ModelConfiguration(format!(
                "tokens encoder produces encodings of size {} but model '{}' expects {}",
                tokens_encoder.encoding_size(),
                model.name(),
                model.token_encoding_size()
            ))
            .into());
        }
        Ok(Self {
            tokens_encoder,
            frames_extractor: FramesExtractor::new(model),
        })
    }

    pub fn model(&self) -> &Arc<FramesExtractorModel> {
        self.frames_extractor.model()
    }

    pub fn extract_frames(&self, tokens: &[Token]) -> Result<Frame> {
        let encodings = self.tokens_encoder.encode(tokens)?;
        if encodings.len() != tokens.len() {
            return Err(format_err!(
                "Tokens encoder returned {} encodings for {} tokens",
                encodings.len(),
                tokens.len()
            ));
        }
        self.frames_extractor.extract_frames(&encodings)?.build_frame()
    }
}
