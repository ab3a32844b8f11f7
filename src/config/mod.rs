//! Configuration loading and management for the invoice pipeline.
//!
//! The pipeline is configured by one explicit [`PipelineConfig`] object and
//! a versioned [`RateMapping`] reference table, both loadable from YAML.
//!
//! # Example
//!
//! ```no_run
//! use invoice_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load_config("./pipeline.yaml").unwrap();
//! println!("GST rate: {}", config.gst_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{PipelineConfig, RateMapping, RatePair};
