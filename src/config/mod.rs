pub mod cli;
pub mod toml_config;

pub use toml_config::RadarConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "skill-radar")]
#[command(about = "Scrape AI/ML job postings and rank the skills they ask for")]
pub struct CliArgs {
    /// Path to TOML configuration file (optional)
    #[arg(short, long, default_value = "skill-radar.toml")]
    pub config: String,

    /// Number of search result pages to scrape per keyword
    #[arg(long)]
    pub pages: Option<usize>,

    /// Number of search keywords to generate
    #[arg(long)]
    pub keywords: Option<usize>,

    /// Location filter (e.g. 'Remote', 'New York')
    #[arg(long)]
    pub location: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of ranked skills to keep
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Ask the model for skills missing from the ranked list
    #[arg(long)]
    pub discover: bool,

    /// Also write every output file into a single zip archive
    #[arg(long)]
    pub bundle: bool,

    /// Log process CPU and memory after each phase
    #[arg(long)]
    pub monitor: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Show the resolved configuration without scraping
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliArgs {
    /// 命令列參數覆蓋檔案設定
    pub fn apply_to(&self, config: &mut RadarConfig) {
        if let Some(pages) = self.pages {
            config.scrape.pages = pages;
        }
        if let Some(keywords) = self.keywords {
            config.analysis.keywords = keywords;
        }
        if let Some(location) = &self.location {
            config.scrape.location = location.clone();
        }
        if let Some(output) = &self.output {
            config.output.output_path = output.clone();
        }
        if let Some(top_n) = self.top_n {
            config.analysis.top_n = top_n;
        }
        if self.discover {
            config.analysis.discover_new_skills = true;
        }
        if self.bundle {
            config.output.bundle = true;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
        if self.json_logs {
            config.monitoring.json_logs = true;
        }
    }
}
