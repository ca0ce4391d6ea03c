pub mod skill_pipeline;

pub use skill_pipeline::SkillPipeline;
