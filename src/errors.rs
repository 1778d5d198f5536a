use failure::Fail;

#[derive(Debug, Fail)]
pub enum FramesExtractorError {
    #[fail(display = "Unknown slot '{}' for intent '{}'", slot, intent)]
    UnknownSlot { intent: String, slot: String },
    #[fail(display = "Unknown intent: '{}'", _0)]
    UnknownIntent(String),
    #[fail(display = "Invalid model configuration: {}", _0)]
    ModelConfiguration(String),
    #[fail(display = "Cannot deserialize frames extractor model: {}", reason)]
    Deserialization { reason: String },
    #[fail(display = "Invalid input: {}", _0)]
    InvalidInput(String),
}

pub type Result<T> = ::std::result::Result<T, ::failure::Error>;
