//! @ai:module:intent Sweep execution and API client
//! @ai:module:layer infrastructure
//! @ai:module:public_api OpenAiClient, SweepExecutor, CompletionResponse

pub mod client;
pub mod executor;

pub use client::{CompletionClientTrait, CompletionResponse, MockCompletionClient, OpenAiClient};
pub use executor::SweepExecutor;
