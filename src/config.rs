use crate::error::{Result, TavilyError};

const DEFAULT_API_URL: &str = "https://api.tavily.com";
const DEFAULT_TIMEOUT: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let api_key = env.required("TAVILY_API_KEY")?.trim().to_string();
        if api_key.is_empty() {
            return Err(TavilyError::ConfigInvalid("TAVILY_API_KEY cannot be empty".into()));
        }

        let api_url = env.opt("TAVILY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        validate_url(&api_url)?;

        Ok(Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            api_key,
            timeout_secs: env.u64_range("TAVILY_TIMEOUT", DEFAULT_TIMEOUT, 1, 600)?,
            include_domains: env.list("TAVILY_INCLUDE_DOMAINS"),
            exclude_domains: env.list("TAVILY_EXCLUDE_DOMAINS"),
        })
    }

    pub fn mask_api_key(&self) -> String {
        mask_key(&self.api_key)
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn required(&self, name: &str) -> Result<String> {
        (self.0)(name).ok_or_else(|| {
            TavilyError::ConfigMissing(format!(
                "{name} not configured.\nPlease configure with:\nclaude mcp add-json tavily-search --scope user \
                '{{\"type\":\"stdio\",\"command\":\"tavily-search-mcp\",\"env\":{{\"TAVILY_API_KEY\":\"your-key\"}}}}'"
            ))
        })
    }

    fn opt(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|s| !s.trim().is_empty())
    }

    fn list(&self, name: &str) -> Vec<String> {
        self.opt(name).map(|raw| split_list(&raw)).unwrap_or_default()
    }

    fn u64_range(&self, name: &str, default: u64, min: u64, max: u64) -> Result<u64> {
        let Some(raw) = self.opt(name) else { return Ok(default) };
        let val: u64 = raw.trim().parse().map_err(|_| {
            TavilyError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}"))
        })?;
        if !(min..=max).contains(&val) {
            return Err(TavilyError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}")));
        }
        Ok(val)
    }
}

/// Splits a comma-separated list, dropping blank entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(TavilyError::ConfigInvalid("TAVILY_API_URL must be a valid http or https URL".into()));
    }
    Ok(())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 8 {
        return "********".into();
    }
    let first: String = chars[..4].iter().collect();
    let last: String = chars[chars.len() - 4..].iter().collect();
    format!("{first}********{last}")
}
