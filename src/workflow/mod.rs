pub mod artwork_ctx;
pub mod artwork_flow;

pub use artwork_ctx::ArtworkCtx;
pub use artwork_flow::{ArtworkFlow, ProcessResult};
