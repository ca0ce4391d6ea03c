pub mod charts;
pub mod export;
pub mod table;

pub use charts::{render_category_pie_chart, render_skills_bar_chart};
pub use export::{bundle_files, jobs_to_csv, report_to_json, timestamp_now};
pub use table::render_skills_table;
