mod aac;
mod error;
mod frame;
mod layout;
mod parser;
mod xheaac;

pub use aac::AacParser;
pub use error::ParseError;
pub use frame::{FrameRecord, SuperFrameOutput};
pub use layout::SuperFrameLayout;
pub use parser::{FrameSource, SuperFrameParser};
pub use xheaac::XheAacParser;
