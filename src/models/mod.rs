mod frames_extractor;

pub use self::frames_extractor::*;
