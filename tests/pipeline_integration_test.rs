use httpmock::prelude::*;
use job_skill_radar::config::toml_config::ScrapeConfig;
use job_skill_radar::domain::model::AnalysisReport;
use job_skill_radar::domain::ports::JobSource;
use job_skill_radar::{
    GroqClient, IndeedScraper, LocalStorage, RadarConfig, RadarEngine, RadarError, SkillPipeline,
};
use tempfile::TempDir;

const SEARCH_PAGE: &str = r#"
<html><body><ul>
  <li><div class="job_seen_beacon">
    <h2 class="jobTitle"><a id="job_abc123"><span title="Machine Learning Engineer">Machine Learning Engineer</span></a></h2>
    <span data-testid="company-name">Acme AI</span>
    <div data-testid="text-location">Remote</div>
  </div></li>
  <li><div class="job_seen_beacon">
    <h2 class="jobTitle"><a id="job_def456"><span>Data Scientist</span></a></h2>
    <span data-testid="company-name">Globex</span>
    <div data-testid="text-location">Austin, TX</div>
  </div></li>
</ul></body></html>"#;

// Second page repeats a card already seen on the first one.
const SECOND_PAGE: &str = r#"
<html><body><ul>
  <li><div class="job_seen_beacon">
    <h2 class="jobTitle"><a id="job_abc123"><span>Machine Learning Engineer</span></a></h2>
    <span data-testid="company-name">Acme AI</span>
  </div></li>
</ul></body></html>"#;

const DETAIL_PAGE: &str = r#"
<html><body>
  <h1>Machine Learning Engineer</h1>
  <div id="salaryInfoAndJobType"><span>$140K - $180K a year</span><span> - Full-time</span></div>
  <div id="jobDescriptionText"><p>Ship models with Python and PyTorch.</p><p>Deploy on k8s.</p></div>
</body></html>"#;

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

fn config_for(llm: &MockServer, listings: &MockServer, output: &TempDir) -> RadarConfig {
    let mut config = RadarConfig::default();
    config.llm.base_url = llm.base_url();
    config.llm.api_key = Some("test-key".to_string());
    config.llm.max_retries = 1;
    config.llm.retry_delay_ms = 1;
    config.scrape.base_url = listings.base_url();
    config.scrape.pages = 2;
    config.scrape.min_delay_ms = 0;
    config.scrape.max_delay_ms = 0;
    config.analysis.keywords = 1;
    config.output.output_path = output.path().to_str().unwrap().to_string();
    config.output.bundle = true;
    config
}

fn scraper_for(listings: &MockServer) -> IndeedScraper {
    let config = ScrapeConfig {
        base_url: listings.base_url(),
        min_delay_ms: 0,
        max_delay_ms: 0,
        ..Default::default()
    };
    IndeedScraper::new(&config).unwrap()
}

fn engine_for(
    config: RadarConfig,
) -> RadarEngine<SkillPipeline<LocalStorage, GroqClient, IndeedScraper>> {
    let model = GroqClient::new(&config.llm, "test-key".to_string()).unwrap();
    let source = IndeedScraper::new(&config.scrape).unwrap();
    let storage = LocalStorage::new(config.output_path().to_string());
    RadarEngine::new(SkillPipeline::new(storage, model, source, config))
}

#[tokio::test]
async fn test_full_run_writes_charts_and_dumps() {
    let llm = MockServer::start();
    let listings = MockServer::start();
    let output = TempDir::new().unwrap();

    let keywords_mock = llm.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .body_contains("job search keywords");
        then.status(200).json_body(completion("[\"AI Engineer\"]"));
    });
    let skills_mock = llm.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .body_contains("Extract the technical skills");
        then.status(200)
            .json_body(completion("```json\n[\"python\", \"PyTorch\", \"k8s\"]\n```"));
    });

    let first_page = listings.mock(|when, then| {
        when.method(GET)
            .path("/jobs")
            .query_param("start", "0");
        then.status(200)
            .header("content-type", "text/html")
            .body(SEARCH_PAGE);
    });
    let second_page = listings.mock(|when, then| {
        when.method(GET).path("/jobs").query_param("start", "10");
        then.status(200)
            .header("content-type", "text/html")
            .body(SECOND_PAGE);
    });
    let good_detail = listings.mock(|when, then| {
        when.method(GET)
            .path("/viewjob")
            .query_param("viewtype", "embedded")
            .query_param("jk", "abc123");
        then.status(200)
            .header("content-type", "text/html")
            .body(DETAIL_PAGE);
    });
    let broken_detail = listings.mock(|when, then| {
        when.method(GET).path("/viewjob").query_param("jk", "def456");
        then.status(500);
    });

    let engine = engine_for(config_for(&llm, &listings, &output));
    let location = engine.run().await.unwrap();

    assert_eq!(location, output.path().to_str().unwrap());
    keywords_mock.assert_hits(1);
    // 只有一筆有描述
    skills_mock.assert_hits(1);
    first_page.assert_hits(1);
    second_page.assert_hits(1);
    good_detail.assert_hits(1);
    broken_detail.assert_hits(1);

    let mut names: Vec<String> = std::fs::read_dir(output.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.len(), 5, "unexpected outputs: {names:?}");
    assert!(names.iter().any(|n| n.starts_with("skills_ranking_") && n.ends_with(".svg")));
    assert!(names.iter().any(|n| n.starts_with("skills_categories_") && n.ends_with(".svg")));
    assert!(names.iter().any(|n| n.starts_with("skills_report_") && n.ends_with(".zip")));

    let json_name = names.iter().find(|n| n.starts_with("results_")).unwrap();
    let report: AnalysisReport =
        serde_json::from_slice(&std::fs::read(output.path().join(json_name)).unwrap()).unwrap();
    assert_eq!(report.total_jobs, 2);
    assert_eq!(report.jobs_with_skills, 1);
    assert_eq!(report.search_keywords, vec!["AI Engineer"]);
    let ranked: Vec<&str> = report.ranked_skills.iter().map(|r| r.skill.as_str()).collect();
    assert_eq!(ranked, vec!["Kubernetes", "PyTorch", "Python"]);
    assert!(report.ranked_skills.iter().all(|r| (r.percentage - 100.0).abs() < 1e-9));
    let kubernetes = report.skill_tallies.iter().find(|t| t.name == "Kubernetes").unwrap();
    assert_eq!(kubernetes.category, "DevOps & Tools");
    assert_eq!(kubernetes.count, 1);

    let csv_name = names.iter().find(|n| n.starts_with("jobs_")).unwrap();
    let mut reader = csv::Reader::from_path(output.path().join(csv_name)).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Machine Learning Engineer");
    assert_eq!(&rows[0][1], "Acme AI");
    assert_eq!(rows[0][5].parse::<f64>().unwrap(), 140_000.0);
    assert_eq!(rows[0][6].parse::<f64>().unwrap(), 180_000.0);
    assert_eq!(&rows[0][7], "Full-time");
    assert_eq!(&rows[0][8], "AI Engineer");
    assert_eq!(&rows[0][9], "python; PyTorch; k8s");
    assert_eq!(&rows[1][0], "Data Scientist");
    assert_eq!(&rows[1][4], "");
}

#[tokio::test]
async fn test_run_without_postings_reports_no_jobs() {
    let llm = MockServer::start();
    let listings = MockServer::start();
    let output = TempDir::new().unwrap();

    llm.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).json_body(completion("[\"AI Engineer\"]"));
    });
    listings.mock(|when, then| {
        when.method(GET).path("/jobs");
        then.status(200).body("<html><body>No results</body></html>");
    });

    let engine = engine_for(config_for(&llm, &listings, &output));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, RadarError::NoJobsFound));
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failed_search_page_ends_pagination() {
    let listings = MockServer::start();

    let first_page = listings.mock(|when, then| {
        when.method(GET).path("/jobs").query_param("start", "0");
        then.status(200)
            .header("content-type", "text/html")
            .body(SEARCH_PAGE);
    });
    let failing_page = listings.mock(|when, then| {
        when.method(GET).path("/jobs").query_param("start", "10");
        then.status(500);
    });
    let third_page = listings.mock(|when, then| {
        when.method(GET).path("/jobs").query_param("start", "20");
        then.status(200)
            .header("content-type", "text/html")
            .body(SECOND_PAGE);
    });
    let details = listings.mock(|when, then| {
        when.method(GET).path("/viewjob");
        then.status(200)
            .header("content-type", "text/html")
            .body(DETAIL_PAGE);
    });

    let jobs = scraper_for(&listings)
        .scrape_with_details("AI Engineer", "", 3)
        .await
        .unwrap();

    first_page.assert_hits(1);
    failing_page.assert_hits(1);
    // 第二頁失敗後不再翻頁
    third_page.assert_hits(0);
    details.assert_hits(2);
    let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Machine Learning Engineer", "Data Scientist"]);
}

#[tokio::test]
async fn test_posting_without_any_title_is_dropped() {
    let listings = MockServer::start();

    listings.mock(|when, then| {
        when.method(GET).path("/jobs").query_param("start", "0");
        then.status(200).header("content-type", "text/html").body(
            r#"<html><body><ul>
  <li><div class="job_seen_beacon"><a id="job_zzz999"></a>
    <span data-testid="company-name">Nameless Corp</span></div></li>
  <li><div class="job_seen_beacon">
    <h2 class="jobTitle"><a id="job_abc123"><span>Machine Learning Engineer</span></a></h2>
  </div></li>
</ul></body></html>"#,
        );
    });
    let untitled_detail = listings.mock(|when, then| {
        when.method(GET).path("/viewjob").query_param("jk", "zzz999");
        then.status(200)
            .header("content-type", "text/html")
            .body("<html><body><div id=\"jobDescriptionText\">Python</div></body></html>");
    });
    listings.mock(|when, then| {
        when.method(GET).path("/viewjob").query_param("jk", "abc123");
        then.status(200)
            .header("content-type", "text/html")
            .body(DETAIL_PAGE);
    });

    let jobs = scraper_for(&listings)
        .scrape_with_details("AI Engineer", "", 1)
        .await
        .unwrap();

    untitled_detail.assert_hits(1);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "Machine Learning Engineer");
    assert!(jobs[0].url.ends_with("jk=abc123"));
}
