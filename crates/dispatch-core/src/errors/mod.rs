/*!
Error Handling

Common error types for the dispatch mediator, plus a small context value
used to label abandoned waits in diagnostics.
*/

pub mod context;
pub mod types;

pub use context::ErrorContext;
pub use types::{Error, Result};
