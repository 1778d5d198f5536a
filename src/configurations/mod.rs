mod frames_extractor;
mod intent_configuration;

pub use self::frames_extractor::{Activation, FramesExtractorConfig};
pub use self::intent_configuration::{
    validate_configurations, IntentConfiguration, NO_SLOT_NAME,
};
