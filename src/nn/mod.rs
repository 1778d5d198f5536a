mod feedforward;
mod init;
mod recurrent;

pub use self::feedforward::{FeedforwardLayer, OutputActivation};
pub use self::init::ParamsInitializer;
pub use self::recurrent::{BiRnn, BiRnnEncoding, RecurrentLayer};
