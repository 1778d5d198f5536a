mod embeddings;

use failure::format_err;
use ndarray::prelude::*;

pub use self::embeddings::{EmbeddingsEncoder, EmbeddingsMap};
use crate::errors::*;
use crate::ontology::Token;
use crate::utils::concatenate;

/// Encodes the tokens of a sentence into fixed size vectors
pub trait TokensEncoder: Send + Sync {
    /// Size of each token encoding
    fn encoding_size(&self) -> usize;

    /// Returns one encoding per token, in the same order
    fn encode(&self, tokens: &[Token]) -> Result<Vec<Array1<f32>>>;
}

/// Concatenates the encodings of several encoders
pub struct EnsembleTokensEncoder {
    components: Vec<Box<dyn TokensEncoder>>,
}

impl EnsembleTokensEncoder {
    pub fn new(components: Vec<Box<dyn TokensEncoder>>) -> Result<Self> {
        if components.is_empty() {
            return Err(FramesExtractorError::ModelConfiguration(
                "an ensemble encoder needs at least one component".to_string(),
            )
            .into());
        }
        Ok(Self { components })
    }
}

impl TokensEncoder for EnsembleTokensEncoder {
    fn encoding_size(&self) -> usize {
        self.components.iter().map(|c| c.encoding_size()).sum()
    }

    fn encode(&self, tokens: &[Token]) -> Result<Vec<Array1<f32>>> {
        let components_encodings = self
            .components
            .iter()
            .map(|component| component.encode(tokens))
            .collect::<Result<Vec<_>>>()?;
        if let Some(encodings) = components_encodings
            .iter()
            .find(|encodings| encodings.len() != tokens.len())
        {
            return Err(format_err!(
                "Encoder returned {} encodings for {} tokens",
                encodings.len(),
                tokens.len()
            ));
        }
        (0..tokens.len())
            .map(|i| {
                let views: Vec<ArrayView1<f32>> = components_encodings
                    .iter()
                    .map(|encodings| encodings[i].view())
                    .collect();
                concatenate(&views)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    struct ConstantEncoder(Array1<f32>);

    impl TokensEncoder for ConstantEncoder {
        fn encoding_size(&self) -> usize {
            self.0.dim()
        }

        fn encode(&self, tokens: &[Token]) -> Result<Vec<Array1<f32>>> {
            Ok(tokens.iter().map(|_| self.0.clone()).collect())
        }
    }

    #[test]
    fn ensemble_encoder_concatenates_encodings() {
        // Given
        let encoder = EnsembleTokensEncoder::new(vec![
            Box::new(ConstantEncoder(array![1.0, 2.0])),
            Box::new(ConstantEncoder(array![3.0])),
        ])
        .unwrap();
        let tokens = vec![Token::new(0, "hello"), Token::new(1, "world")];

        // When
        let encodings = encoder.encode(&tokens).unwrap();

        // Then
        assert_eq!(3, encoder.encoding_size());
        assert_eq!(vec![array![1.0, 2.0, 3.0], array![1.0, 2.0, 3.0]], encodings);
    }

    #[test]
    fn empty_ensemble_is_rejected() {
        assert!(EnsembleTokensEncoder::new(vec![]).is_err());
    }
}
