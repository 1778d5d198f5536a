use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::ops::Range;
use std::path::Path;

use failure::{format_err, ResultExt};
use log::info;
use ndarray::prelude::*;

use crate::configurations::{
    validate_configurations, Activation, FramesExtractorConfig, IntentConfiguration,
};
use crate::errors::*;
use crate::models::{BiRnnData, FeedforwardData, FramesExtractorModelData, RecurrentLayerData};
use crate::nn::{BiRnn, FeedforwardLayer, OutputActivation, ParamsInitializer, RecurrentLayer};
use crate::slot_layout::SlotsLayout;
use crate::utils::{array2_from_rows, array2_to_rows};

/// The parameters of a frames extractor.
///
/// Two BiRNNs encode the same token encodings. The concatenation of their summaries feeds
/// the intent network, which classifies over all the configured intents. For each token,
/// the concatenation of the slots classification of the previous token and of the BiRNNs
/// token outputs feeds the slots network, which classifies over the slots of all the
/// intents (see [`SlotsLayout`]).
///
/// A model is immutable once built and can be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct FramesExtractorModel {
    name: String,
    intents_configuration: Vec<IntentConfiguration>,
    config: FramesExtractorConfig,
    layout: SlotsLayout,
    bi_rnn_1: BiRnn,
    bi_rnn_2: BiRnn,
    intent_network: FeedforwardLayer,
    slots_network: FeedforwardLayer,
}

impl FramesExtractorModel {
    /// Builds a model with randomly initialized parameters, using the seed of the config.
    pub fn new<S: Into<String>>(
        name: S,
        intents_configuration: Vec<IntentConfiguration>,
        config: FramesExtractorConfig,
    ) -> Result<Self> {
        config.validate()?;
        validate_configurations(&intents_configuration)?;

        let layout = SlotsLayout::new(&intents_configuration);
        let mut initializer = ParamsInitializer::new(config.seed);
        let bi_rnn_1 = init_bi_rnn(&mut initializer, &config)?;
        let bi_rnn_2 = init_bi_rnn(&mut initializer, &config)?;

        let summaries_size = bi_rnn_1.output_size() + bi_rnn_2.output_size();
        let nb_intents = intents_configuration.len();
        let intent_network = FeedforwardLayer::new(
            initializer.matrix(nb_intents, summaries_size),
            initializer.biases(nb_intents),
            OutputActivation::Softmax,
        )?;

        let slots_output_size = layout.output_size();
        let slots_network = FeedforwardLayer::new(
            initializer.matrix(slots_output_size, slots_output_size + summaries_size),
            initializer.biases(slots_output_size),
            OutputActivation::Softmax,
        )?;

        Ok(Self {
            name: name.into(),
            intents_configuration,
            config,
            layout,
            bi_rnn_1,
            bi_rnn_2,
            intent_network,
            slots_network,
        })
    }

    /// Builds a model out of already computed parameters.
    ///
    /// Fails with a `ModelConfiguration` error when the parameters shapes do not match the
    /// configurations and the config.
    pub fn from_parameters<S: Into<String>>(
        name: S,
        intents_configuration: Vec<IntentConfiguration>,
        config: FramesExtractorConfig,
        bi_rnn_1: BiRnn,
        bi_rnn_2: BiRnn,
        intent_network: FeedforwardLayer,
        slots_network: FeedforwardLayer,
    ) -> Result<Self> {
        config.validate()?;
        validate_configurations(&intents_configuration)?;
        let model = Self {
            name: name.into(),
            layout: SlotsLayout::new(&intents_configuration),
            intents_configuration,
            config,
            bi_rnn_1,
            bi_rnn_2,
            intent_network,
            slots_network,
        };
        match model.shapes_mismatch() {
            Some(reason) => Err(FramesExtractorError::ModelConfiguration(reason).into()),
            None => Ok(model),
        }
    }

    fn shapes_mismatch(&self) -> Option<String> {
        let config = &self.config;
        for (bi_rnn, label) in &[(&self.bi_rnn_1, "first"), (&self.bi_rnn_2, "second")] {
            if bi_rnn.input_size() != config.token_encoding_size {
                return Some(format!(
                    "{} BiRNN expects inputs of size {} instead of {}",
                    label,
                    bi_rnn.input_size(),
                    config.token_encoding_size
                ));
            }
            if bi_rnn.hidden_size() != config.hidden_size {
                return Some(format!(
                    "{} BiRNN has a hidden size of {} instead of {}",
                    label,
                    bi_rnn.hidden_size(),
                    config.hidden_size
                ));
            }
        }
        let summaries_size = self.bi_rnn_1.output_size() + self.bi_rnn_2.output_size();
        let expected_intent_network = (self.intents_configuration.len(), summaries_size);
        let actual_intent_network = (
            self.intent_network.output_size(),
            self.intent_network.input_size(),
        );
        if actual_intent_network != expected_intent_network {
            return Some(format!(
                "intent network has shape {:?} instead of {:?}",
                actual_intent_network, expected_intent_network
            ));
        }
        let slots_output_size = self.layout.output_size();
        let expected_slots_network = (slots_output_size, slots_output_size + summaries_size);
        let actual_slots_network = (
            self.slots_network.output_size(),
            self.slots_network.input_size(),
        );
        if actual_slots_network != expected_slots_network {
            return Some(format!(
                "slots network has shape {:?} instead of {:?}",
                actual_slots_network, expected_slots_network
            ));
        }
        None
    }
}

impl FramesExtractorModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intents_configuration(&self) -> &[IntentConfiguration] {
        &self.intents_configuration
    }

    pub fn config(&self) -> &FramesExtractorConfig {
        &self.config
    }

    pub fn token_encoding_size(&self) -> usize {
        self.config.token_encoding_size
    }

    pub fn layout(&self) -> &SlotsLayout {
        &self.layout
    }

    pub fn slots_offsets(&self) -> &[usize] {
        self.layout.slots_offsets()
    }

    pub fn no_slot_indices(&self) -> &BTreeSet<usize> {
        self.layout.no_slot_indices()
    }

    /// Range of the slots of the given intent, within the concatenation of all the intents
    /// slots
    pub fn slots_range(&self, intent_index: usize) -> Range<usize> {
        self.layout.slots_range(intent_index)
    }

    /// Offset from which the slots of the given intent start, within the concatenation of
    /// all the intents slots
    pub fn slots_offset(&self, intent_name: &str) -> Result<usize> {
        self.intents_configuration
            .iter()
            .position(|configuration| configuration.name() == intent_name)
            .map(|intent_index| self.layout.slots_offsets()[intent_index])
            .ok_or_else(|| FramesExtractorError::UnknownIntent(intent_name.to_string()).into())
    }

    pub fn bi_rnn_1(&self) -> &BiRnn {
        &self.bi_rnn_1
    }

    pub fn bi_rnn_2(&self) -> &BiRnn {
        &self.bi_rnn_2
    }

    pub fn intent_network(&self) -> &FeedforwardLayer {
        &self.intent_network
    }

    pub fn slots_network(&self) -> &FeedforwardLayer {
        &self.slots_network
    }
}

impl FramesExtractorModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading frames extractor model ({:?}) ...", path.as_ref());
        let model_file = File::open(&path).with_context(|_| {
            format!(
                "Cannot open frames extractor model file '{:?}'",
                path.as_ref()
            )
        })?;
        Self::load(BufReader::new(model_file))
    }

    pub fn dump_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        info!(
            "Dumping frames extractor model '{}' ({:?}) ...",
            self.name,
            path.as_ref()
        );
        let model_file = File::create(&path).with_context(|_| {
            format!(
                "Cannot create frames extractor model file '{:?}'",
                path.as_ref()
            )
        })?;
        let mut writer = BufWriter::new(model_file);
        self.dump(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a model serialized with [`dump`](#method.dump)
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_reader(reader).map_err(deserialization_error)?;
        let model_version = value
            .get("model_version")
            .and_then(|version| version.as_str())
            .ok_or_else(|| deserialization_error("missing model version"))?;
        if model_version != crate::MODEL_VERSION {
            return Err(deserialization_error(format!(
                "expected model version {} but found {}",
                crate::MODEL_VERSION,
                model_version
            ))
            .into());
        }
        let data: FramesExtractorModelData =
            serde_json::from_value(value).map_err(deserialization_error)?;
        let model = Self::from_data(data)?;
        info!(
            "Frames extractor model '{}' loaded ({} intents, {} slots classes)",
            model.name,
            model.intents_configuration.len(),
            model.layout.output_size()
        );
        Ok(model)
    }

    pub fn dump<W: Write>(&self, writer: W) -> Result<()> {
        let data = FramesExtractorModelData {
            model_version: crate::MODEL_VERSION.to_string(),
            name: self.name.clone(),
            config: self.config.clone(),
            intents_configuration: self.intents_configuration.clone(),
            bi_rnn_1: bi_rnn_to_data(&self.bi_rnn_1),
            bi_rnn_2: bi_rnn_to_data(&self.bi_rnn_2),
            intent_network: feedforward_to_data(&self.intent_network),
            slots_network: feedforward_to_data(&self.slots_network),
        };
        serde_json::to_writer(writer, &data)
            .with_context(|_| "Cannot serialize frames extractor model")?;
        Ok(())
    }

    fn from_data(data: FramesExtractorModelData) -> Result<Self> {
        data.config.validate()?;
        validate_configurations(&data.intents_configuration)?;
        let activation = data.config.hidden_activation;
        let bi_rnn_1 = bi_rnn_from_data(&data.bi_rnn_1, activation)
            .map_err(|e| deserialization_error(format!("first BiRNN: {}", e)))?;
        let bi_rnn_2 = bi_rnn_from_data(&data.bi_rnn_2, activation)
            .map_err(|e| deserialization_error(format!("second BiRNN: {}", e)))?;
        let intent_network = feedforward_from_data(&data.intent_network)
            .map_err(|e| deserialization_error(format!("intent network: {}", e)))?;
        let slots_network = feedforward_from_data(&data.slots_network)
            .map_err(|e| deserialization_error(format!("slots network: {}", e)))?;
        let model = Self {
            name: data.name,
            layout: SlotsLayout::new(&data.intents_configuration),
            intents_configuration: data.intents_configuration,
            config: data.config,
            bi_rnn_1,
            bi_rnn_2,
            intent_network,
            slots_network,
        };
        match model.shapes_mismatch() {
            Some(reason) => Err(deserialization_error(reason).into()),
            None => Ok(model),
        }
    }
}

fn deserialization_error<D: ToString>(reason: D) -> FramesExtractorError {
    FramesExtractorError::Deserialization {
        reason: reason.to_string(),
    }
}

fn init_bi_rnn(
    initializer: &mut ParamsInitializer,
    config: &FramesExtractorConfig,
) -> Result<BiRnn> {
    let mut init_layer = || {
        RecurrentLayer::new(
            initializer.matrix(config.hidden_size, config.token_encoding_size),
            initializer.matrix(config.hidden_size, config.hidden_size),
            initializer.biases(config.hidden_size),
            config.hidden_activation,
        )
    };
    let left_to_right = init_layer()?;
    let right_to_left = init_layer()?;
    BiRnn::new(left_to_right, right_to_left)
}

fn matrix_from_rows(rows: &[Vec<f32>], nb_rows: usize, name: &str) -> Result<Array2<f32>> {
    let nb_columns = rows.first().map(|row| row.len()).unwrap_or(0);
    if rows.len() != nb_rows {
        return Err(format_err!(
            "{} has {} rows instead of {}",
            name,
            rows.len(),
            nb_rows
        ));
    }
    array2_from_rows(rows, nb_columns)
        .ok_or_else(|| format_err!("{} rows do not have the same length", name))
}

fn bi_rnn_from_data(data: &BiRnnData, activation: Activation) -> Result<BiRnn> {
    let layer_from_data = |layer: &RecurrentLayerData| -> Result<RecurrentLayer> {
        let hidden_size = layer.biases.len();
        RecurrentLayer::new(
            matrix_from_rows(&layer.input_weights, hidden_size, "input weights")?,
            matrix_from_rows(&layer.recurrent_weights, hidden_size, "recurrent weights")?,
            Array1::from_vec(layer.biases.clone()),
            activation,
        )
    };
    BiRnn::new(
        layer_from_data(&data.left_to_right)?,
        layer_from_data(&data.right_to_left)?,
    )
}

fn feedforward_from_data(data: &FeedforwardData) -> Result<FeedforwardLayer> {
    FeedforwardLayer::new(
        matrix_from_rows(&data.weights, data.biases.len(), "weights")?,
        Array1::from_vec(data.biases.clone()),
        OutputActivation::Softmax,
    )
}

fn bi_rnn_to_data(bi_rnn: &BiRnn) -> BiRnnData {
    let layer_to_data = |layer: &RecurrentLayer| RecurrentLayerData {
        input_weights: array2_to_rows(layer.input_weights()),
        recurrent_weights: array2_to_rows(layer.recurrent_weights()),
        biases: layer.biases().to_vec(),
    };
    BiRnnData {
        left_to_right: layer_to_data(bi_rnn.left_to_right()),
        right_to_left: layer_to_data(bi_rnn.right_to_left()),
    }
}

fn feedforward_to_data(layer: &FeedforwardLayer) -> FeedforwardData {
    FeedforwardData {
        weights: array2_to_rows(layer.weights()),
        biases: layer.biases().to_vec(),
    }
}
