use crate::utils::error::{RadarError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> RadarError {
    RadarError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Endpoints must be absolute http(s) URLs with a host.
pub fn validate_endpoint(field: &str, raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(invalid(field, raw, "URL cannot be empty"));
    }

    let url = Url::parse(raw).map_err(|e| invalid(field, raw, format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(field, raw, format!("Unsupported URL scheme: {}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid(field, raw, "URL has no host"));
    }
    Ok(url)
}

pub fn validate_count(field: &str, value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("Value must be between {} and {}", min, max)));
    }
    Ok(())
}

pub fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

/// Randomized request delays are drawn from `min..=max`.
pub fn validate_delay_window(min_ms: u64, max_ms: u64) -> Result<()> {
    if max_ms < min_ms {
        return Err(invalid(
            "scrape.max_delay_ms",
            max_ms,
            format!("Must not be below scrape.min_delay_ms ({})", min_ms),
        ));
    }
    Ok(())
}

/// The output location may not exist yet, but it must not be a regular file.
pub fn validate_output_dir(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path, "Path contains null bytes"));
    }
    if Path::new(path).is_file() {
        return Err(invalid(field, path, "Path points to a file, expected a directory"));
    }
    Ok(())
}

pub fn require_api_key<'a>(env_var: &str, key: &'a Option<String>) -> Result<&'a str> {
    key.as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| RadarError::MissingConfigError {
            field: env_var.to_string(),
        })
}
