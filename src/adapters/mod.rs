// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod groq;
pub mod indeed;
pub mod prompts;
pub mod throttle;

pub use groq::GroqClient;
pub use indeed::IndeedScraper;
