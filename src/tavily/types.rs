use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl SearchDepth {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    #[default]
    General,
    News,
}

impl Topic {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "general" => Some(Self::General),
            "news" => Some(Self::News),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// Accepts the full names and their single-letter aliases.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "day" | "d" => Some(Self::Day),
            "week" | "w" => Some(Self::Week),
            "month" | "m" => Some(Self::Month),
            "year" | "y" => Some(Self::Year),
            _ => None,
        }
    }
}

/// Outbound body for `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_depth: SearchDepth,
    pub topic: Topic,
    pub days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    pub max_results: u32,
    pub include_images: bool,
    pub include_image_descriptions: bool,
    pub include_answer: bool,
    pub include_raw_content: bool,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub results: Vec<SearchHit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageResult>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

/// Tavily returns bare URLs unless image descriptions were requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageResult {
    Url(String),
    Described {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl ImageResult {
    pub fn url(&self) -> &str {
        match self {
            ImageResult::Url(url) => url,
            ImageResult::Described { url, .. } => url,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ImageResult::Url(_) => None,
            ImageResult::Described { description, .. } => description.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_aliases() {
        assert_eq!(TimeRange::parse("d"), Some(TimeRange::Day));
        assert_eq!(TimeRange::parse("Week"), Some(TimeRange::Week));
        assert_eq!(TimeRange::parse("m"), Some(TimeRange::Month));
        assert_eq!(TimeRange::parse("y"), Some(TimeRange::Year));
        assert_eq!(TimeRange::parse("decade"), None);
    }

    #[test]
    fn decodes_provider_response() {
        let body = r#"{
            "query": "rust",
            "answer": null,
            "response_time": 1.42,
            "images": ["https://a.example/1.png", {"url": "https://a.example/2.png", "description": "crab"}],
            "results": [
                {"title": "Rust", "url": "https://www.rust-lang.org", "content": "A language", "score": 0.98, "raw_content": null}
            ],
            "follow_up_questions": null
        }"#;
        let result: SearchResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.answer, None);
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].published_date, None);
        let images = result.images.unwrap();
        assert_eq!(images[0], ImageResult::Url("https://a.example/1.png".into()));
        assert_eq!(images[1].description(), Some("crab"));
        assert_eq!(images[1].url(), "https://a.example/2.png");
    }

    #[test]
    fn request_omits_unset_time_range() {
        let request = SearchRequest {
            query: "q".into(),
            search_depth: SearchDepth::Advanced,
            topic: Topic::News,
            days: 3,
            time_range: None,
            max_results: 5,
            include_images: false,
            include_image_descriptions: false,
            include_answer: true,
            include_raw_content: false,
            include_domains: vec![],
            exclude_domains: vec!["example.com".into()],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["search_depth"], "advanced");
        assert_eq!(value["topic"], "news");
        assert!(value.get("time_range").is_none());
        assert_eq!(value["exclude_domains"][0], "example.com");
    }
}
