//! Data models for records and configuration.

pub mod config;
pub mod record;

pub use config::{
    ExtractionConfig, FetchConfig, InputConfig, ResumergeConfig, RulesetChoice, StoreConfig,
};
pub use record::{Field, ResumeRecord};
