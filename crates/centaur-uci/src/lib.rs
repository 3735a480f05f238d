//! UCI client for the external evaluator engine.

pub mod client;
pub mod error;
pub mod info;

pub use client::UciClient;
pub use error::UciError;
pub use info::{EngineReply, InfoLine, ScoreInfo, parse_engine_line};
