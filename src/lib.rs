pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

pub use crate::adapters::{GroqClient, IndeedScraper};
pub use crate::app::pipelines::SkillPipeline;
pub use crate::config::{cli::LocalStorage, RadarConfig};
pub use crate::core::etl::RadarEngine;
pub use crate::utils::error::{RadarError, Result};

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;
