use crate::domain::model::{AnalysisReport, JobPosting};
use crate::utils::error::{RadarError, Result};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One row of `jobs_<timestamp>.csv`.
#[derive(Debug, Serialize)]
struct JobRow<'a> {
    title: &'a str,
    company: &'a str,
    location: &'a str,
    url: &'a str,
    description: &'a str,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    job_type: &'a str,
    search_keyword: &'a str,
    skills: String,
}

impl<'a> From<&'a JobPosting> for JobRow<'a> {
    fn from(job: &'a JobPosting) -> Self {
        Self {
            title: &job.title,
            company: &job.company,
            location: &job.location,
            url: &job.url,
            description: &job.description,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            job_type: job.job_type.as_deref().unwrap_or(""),
            search_keyword: &job.search_keyword,
            skills: job.skills.join("; "),
        }
    }
}

pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn report_to_json(report: &AnalysisReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}

/// Returns `None` for an empty job list so no header-only file is written.
pub fn jobs_to_csv(jobs: &[JobPosting]) -> Result<Option<Vec<u8>>> {
    if jobs.is_empty() {
        tracing::warn!("No jobs to save");
        return Ok(None);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for job in jobs {
        writer.serialize(JobRow::from(job))?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| RadarError::IoError(std::io::Error::other(e.error().to_string())))?;
    Ok(Some(data))
}

/// Packs already-rendered output files into one zip archive.
pub fn bundle_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{RankedSkill, SkillTally};

    fn posting() -> JobPosting {
        JobPosting {
            title: "AI Engineer".to_string(),
            company: "Acme, Inc.".to_string(),
            location: "Remote".to_string(),
            url: "https://listings.test/viewjob?jk=1".to_string(),
            description: "Python\nPyTorch".to_string(),
            salary_min: Some(100_000.0),
            search_keyword: "AI Engineer".to_string(),
            skills: vec!["Python".to_string(), "PyTorch".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_jobs_csv_columns() {
        let data = jobs_to_csv(&[posting()]).unwrap().unwrap();
        let mut reader = csv::Reader::from_reader(data.as_slice());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec![
                "title", "company", "location", "url", "description", "salary_min",
                "salary_max", "job_type", "search_keyword", "skills"
            ]
        );

        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "Acme, Inc.");
        assert_eq!(&row[4], "Python\nPyTorch");
        assert_eq!(&row[6], "");
        assert_eq!(&row[9], "Python; PyTorch");
    }

    #[test]
    fn test_empty_jobs_write_nothing() {
        assert!(jobs_to_csv(&[]).unwrap().is_none());
    }

    #[test]
    fn test_report_json_shape() {
        let report = AnalysisReport {
            timestamp: "20250101_120000".to_string(),
            total_jobs: 4,
            jobs_with_skills: 2,
            search_keywords: vec!["AI Engineer".to_string()],
            ranked_skills: vec![RankedSkill {
                skill: "Python".to_string(),
                count: 2,
                percentage: 100.0,
            }],
            skill_tallies: vec![SkillTally {
                name: "Python".to_string(),
                count: 2,
                category: "Programming Languages".to_string(),
            }],
            categories: vec![],
            discovered_skills: vec![],
        };
        let value: serde_json::Value = serde_json::from_slice(&report_to_json(&report).unwrap()).unwrap();

        assert_eq!(value["total_jobs"], 4);
        assert_eq!(value["ranked_skills"][0]["skill"], "Python");
        assert_eq!(value["ranked_skills"][0]["percentage"], 100.0);
        assert_eq!(value["skill_tallies"][0]["category"], "Programming Languages");
        assert!(value.get("discovered_skills").is_none());
    }

    #[test]
    fn test_bundle_contains_files() {
        let files = vec![
            ("results.json".to_string(), b"{}".to_vec()),
            ("jobs.csv".to_string(), b"title\n".to_vec()),
        ];
        let data = bundle_files(&files).unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
    }
}
