/*!
Configuration System

Timing configuration for the dispatch mediator:

- Serde-backed schema with TOML loading
- Self-validation after load
*/

pub mod schema;

pub use schema::{DispatchConfig, SelfValidating};
