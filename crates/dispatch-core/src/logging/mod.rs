/*!
Logging

Standardized logging setup for embedders of the dispatch mediator:

- Logging setup and configuration
- Idempotent subscriber installation
*/

pub mod setup;

pub use setup::{log_welcome, parse_log_level, setup_logging, LoggingConfig};
