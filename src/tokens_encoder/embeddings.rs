use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use failure::{bail, ResultExt};
use log::info;
use ndarray::prelude::*;

use crate::errors::*;
use crate::ontology::Token;
use crate::tokens_encoder::TokensEncoder;

/// Pre-trained word embeddings
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingsMap {
    size: usize,
    embeddings: HashMap<String, Array1<f32>>,
}

impl EmbeddingsMap {
    pub fn new(size: usize, embeddings: HashMap<String, Array1<f32>>) -> Result<Self> {
        if let Some((word, vector)) = embeddings.iter().find(|(_, v)| v.dim() != size) {
            bail!(
                "Embedding of '{}' has size {} instead of {}",
                word,
                vector.dim(),
                size
            );
        }
        Ok(Self { size, embeddings })
    }

    /// Reads embeddings in the word2vec text format: one word per line followed by its
    /// values, separated by spaces. A leading `<count> <size>` header line is optional.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut size: Option<usize> = None;
        let mut embeddings = HashMap::new();
        for (line_index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let mut elements = line.split_whitespace();
            let word = match elements.next() {
                Some(word) => word,
                None => continue,
            };
            let values = elements
                .map(f32::from_str)
                .collect::<::std::result::Result<Vec<f32>, _>>()
                .with_context(|_| format!("Invalid embedding value at line {}", line_index + 1))?;
            if line_index == 0 && values.len() == 1 && usize::from_str(word).is_ok() {
                size = Some(values[0] as usize);
                continue;
            }
            let expected_size = *size.get_or_insert(values.len());
            if values.len() != expected_size {
                bail!(
                    "Embedding at line {} has size {} instead of {}",
                    line_index + 1,
                    values.len(),
                    expected_size
                );
            }
            embeddings.insert(word.to_string(), Array1::from_vec(values));
        }
        Self::new(size.unwrap_or(0), embeddings)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading embeddings ({:?}) ...", path.as_ref());
        let file = File::open(&path)
            .with_context(|_| format!("Cannot open embeddings file {:?}", path.as_ref()))?;
        let embeddings = Self::from_reader(file)
            .with_context(|_| format!("Cannot read embeddings file {:?}", path.as_ref()))?;
        info!("{} embeddings loaded", embeddings.len());
        Ok(embeddings)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&Array1<f32>> {
        self.embeddings.get(word)
    }
}

/// Encodes tokens with the embeddings of their forms.
///
/// Forms are looked up as they are, then lowercased. Unknown forms are encoded with a zero
/// vector.
pub struct EmbeddingsEncoder {
    embeddings: Arc<EmbeddingsMap>,
    unknown: Array1<f32>,
}

impl EmbeddingsEncoder {
    pub fn new(embeddings: Arc<EmbeddingsMap>) -> Self {
        let unknown = Array1::zeros(embeddings.size());
        Self {
            embeddings,
            unknown,
        }
    }

    fn encode_form(&self, form: &str) -> &Array1<f32> {
        self.embeddings
            .get(form)
            .or_else(|| self.embeddings.get(&form.to_lowercase()))
            .unwrap_or(&self.unknown)
    }
}

impl TokensEncoder for EmbeddingsEncoder {
    fn encoding_size(&self) -> usize {
        self.embeddings.size()
    }

    fn encode(&self, tokens: &[Token]) -> Result<Vec<Array1<f32>>> {
        Ok(tokens
            .iter()
            .map(|token| self.encode_form(&token.form).clone())
            .collect())
    }
}
