use crate::adapters::throttle::{random_user_agent, Throttle};
use crate::config::toml_config::ScrapeConfig;
use crate::domain::model::JobPosting;
use crate::domain::ports::JobSource;
use crate::utils::error::{RadarError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

const RESULTS_PER_PAGE: usize = 10;

/// A job card as it appears on a search results page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobCard {
    pub job_key: String,
    pub title: String,
    pub company: String,
    pub location: String,
}

/// Fields read from a posting's detail page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDetail {
    pub title: String,
    pub description: String,
    pub job_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

struct Selectors {
    card: Selector,
    card_boundary: Selector,
    card_title: Selector,
    company: Selector,
    location: Selector,
    description: Selector,
    page_title: Selector,
    heading: Selector,
    salary_and_type: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            card: parse_selector(r#"a[id^="job_"]"#)?,
            card_boundary: parse_selector(".job_seen_beacon, .cardOutline, li")?,
            card_title: parse_selector("span[title], .jobTitle")?,
            company: parse_selector(r#"[data-testid="company-name"], .companyName"#)?,
            location: parse_selector(r#"[data-testid="text-location"], .companyLocation"#)?,
            description: parse_selector("#jobDescriptionText")?,
            page_title: parse_selector("title")?,
            heading: parse_selector("h1")?,
            salary_and_type: parse_selector("#salaryInfoAndJobType span")?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| RadarError::ProcessingError {
        message: format!("invalid selector '{}': {}", css, e),
    })
}

fn element_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Scrapes an Indeed-style listings site: search pages hold job cards, and each
/// card's key opens an embedded detail page with the full description.
pub struct IndeedScraper {
    client: Client,
    base_url: Url,
    throttle: Throttle,
    selectors: Selectors,
    salary_re: Regex,
}

impl IndeedScraper {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| RadarError::InvalidConfigValueError {
            field: "scrape.base_url".to_string(),
            value: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        let salary_re =
            Regex::new(r"\$\s*([\d,]+(?:\.\d+)?)(\s*[kK])?").map_err(|e| RadarError::ProcessingError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            throttle: Throttle::new(config.min_delay_ms, config.max_delay_ms),
            selectors: Selectors::new()?,
            salary_re,
        })
    }

    pub fn search_url(&self, query: &str, location: &str, page: usize) -> Result<Url> {
        let mut url = self.endpoint("jobs")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("l", location)
            .append_pair("start", &(page * RESULTS_PER_PAGE).to_string());
        Ok(url)
    }

    pub fn detail_url(&self, job_key: &str) -> Result<Url> {
        let mut url = self.endpoint("viewjob")?;
        url.query_pairs_mut()
            .append_pair("viewtype", "embedded")
            .append_pair("jk", job_key);
        Ok(url)
    }

    pub fn posting_url(&self, job_key: &str) -> Result<Url> {
        let mut url = self.endpoint("viewjob")?;
        url.query_pairs_mut().append_pair("jk", job_key);
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path).map_err(|e| RadarError::ProcessingError {
            message: format!("cannot build {} URL: {}", path, e),
        })
    }

    async fn fetch_html(&self, url: &Url) -> Result<String> {
        let delay = self.throttle.wait().await;
        tracing::debug!("GET {} (after {:?})", url, delay);

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, random_user_agent())
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                self.throttle.record_failure().await;
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.throttle.record_failure().await;
            return Err(RadarError::ScrapeError {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        self.throttle.record_success().await;
        Ok(response.text().await?)
    }

    pub fn parse_search_page(&self, html: &str) -> Vec<JobCard> {
        let document = Html::parse_document(html);
        let s = &self.selectors;

        document
            .select(&s.card)
            .filter_map(|anchor| {
                let id = anchor.value().attr("id")?;
                let job_key = id.rsplit('_').next()?.trim().to_string();
                if job_key.is_empty() {
                    return None;
                }

                let title = anchor
                    .select(&s.card_title)
                    .next()
                    .and_then(|t| t.value().attr("title").map(str::to_string).or_else(|| Some(element_text(t, " "))))
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| element_text(anchor, " "));

                // 公司與地點在卡片容器內，不在連結本身
                let (company, location) = match self.card_container(anchor) {
                    Some(card) => (
                        card.select(&s.company).next().map(|e| element_text(e, " ")).unwrap_or_default(),
                        card.select(&s.location).next().map(|e| element_text(e, " ")).unwrap_or_default(),
                    ),
                    None => (String::new(), String::new()),
                };

                Some(JobCard {
                    job_key,
                    title,
                    company,
                    location,
                })
            })
            .collect()
    }

    /// Widest ancestor of a card anchor that still holds only that card,
    /// stopping early at a recognizable card element.
    fn card_container<'a>(&self, anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let s = &self.selectors;
        let mut container = None;
        for el in anchor.ancestors().filter_map(ElementRef::wrap) {
            if el.select(&s.card).nth(1).is_some() {
                break;
            }
            container = Some(el);
            if s.card_boundary.matches(&el) {
                break;
            }
        }
        container
    }

    pub fn parse_detail_page(&self, html: &str) -> JobDetail {
        let document = Html::parse_document(html);
        let s = &self.selectors;

        let description = document
            .select(&s.description)
            .next()
            .map(|e| element_text(e, "\n"))
            .unwrap_or_default();

        // 以 <title> 為準，空白時才用 <h1>
        let title = [&s.page_title, &s.heading]
            .into_iter()
            .filter_map(|selector| document.select(selector).next())
            .map(|e| element_text(e, " "))
            .find(|t| !t.is_empty())
            .unwrap_or_default();

        let mut detail = JobDetail {
            title,
            description,
            ..Default::default()
        };

        for span in document.select(&s.salary_and_type) {
            let text = element_text(span, " ");
            if text.is_empty() {
                continue;
            }
            if text.contains('$') {
                let (min, max) = self.parse_salary_range(&text);
                detail.salary_min = detail.salary_min.or(min);
                detail.salary_max = detail.salary_max.or(max);
            } else {
                let job_type = text.trim_start_matches(['-', ' ']).to_string();
                if !job_type.is_empty() {
                    detail.job_type = Some(job_type);
                }
            }
        }

        detail
    }

    /// "$120,000 - $150,000 a year" -> (120000, 150000); a single figure fills both ends.
    pub fn parse_salary_range(&self, text: &str) -> (Option<f64>, Option<f64>) {
        let amounts: Vec<f64> = self
            .salary_re
            .captures_iter(text)
            .filter_map(|caps| {
                let value: f64 = caps[1].replace(',', "").parse().ok()?;
                Some(if caps.get(2).is_some() { value * 1000.0 } else { value })
            })
            .collect();

        match amounts.as_slice() {
            [] => (None, None),
            [single] => (Some(*single), Some(*single)),
            [first, .., last] => (Some(*first), Some(*last)),
        }
    }

    async fn fetch_posting(&self, card: JobCard, query: &str) -> Result<JobPosting> {
        let mut posting = JobPosting {
            title: card.title,
            company: card.company,
            location: card.location,
            url: self.posting_url(&card.job_key)?.to_string(),
            search_keyword: query.to_string(),
            ..Default::default()
        };

        let detail_url = self.detail_url(&card.job_key)?;
        match self.fetch_html(&detail_url).await {
            Ok(html) => {
                let detail = self.parse_detail_page(&html);
                if posting.title.is_empty() {
                    posting.title = detail.title;
                }
                posting.description = detail.description;
                posting.job_type = detail.job_type;
                posting.salary_min = detail.salary_min;
                posting.salary_max = detail.salary_max;
            }
            Err(e) => {
                tracing::warn!("Could not load details for job {}: {}", card.job_key, e);
            }
        }

        Ok(posting)
    }
}

#[async_trait]
impl JobSource for IndeedScraper {
    async fn scrape_with_details(
        &self,
        query: &str,
        location: &str,
        num_pages: usize,
    ) -> Result<Vec<JobPosting>> {
        let mut seen = HashSet::new();
        let mut postings = Vec::new();

        for page in 0..num_pages {
            let url = self.search_url(query, location, page)?;
            let html = match self.fetch_html(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Search page {} for '{}' failed: {}", page + 1, query, e);
                    break;
                }
            };

            let cards = self.parse_search_page(&html);
            tracing::debug!("Page {} for '{}': {} job cards", page + 1, query, cards.len());
            if cards.is_empty() {
                break;
            }

            for card in cards {
                if !seen.insert(card.job_key.clone()) {
                    continue;
                }
                let posting = self.fetch_posting(card, query).await?;
                if posting.title.trim().is_empty() {
                    continue;
                }
                postings.push(posting);
            }
        }

        Ok(postings)
    }
}
