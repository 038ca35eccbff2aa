//! Configuration types
//!
//! - `base`: core configuration (Config, Format)
//! - `writer`: writer and display configuration
//! - `fields`: global fields attached to every event
//! - `presets`: development, production and environment-driven setups

mod base;
mod fields;
mod presets;
mod writer;

pub use base::{Config, Format};
pub use fields::Fields;
pub use writer::{DisplayConfig, WriterConfig};
