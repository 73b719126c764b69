//! Pipeline step implementations.

mod author;
mod burn;
mod master;
mod transcode;

pub use author::AuthorStep;
pub use burn::BurnStep;
pub use master::MasterStep;
pub use transcode::TranscodeStep;
