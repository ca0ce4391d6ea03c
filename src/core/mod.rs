pub mod aggregate;
pub mod etl;

pub use crate::domain::model::{AnalysisResult, JobPosting, ScrapeResult};
pub use crate::domain::ports::{JobSource, Pipeline, SkillModel, Storage};
pub use crate::utils::error::Result;
