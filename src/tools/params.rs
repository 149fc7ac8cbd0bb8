//! Normalization of raw tool arguments into typed parameter records.
//!
//! Only `query` is strictly validated. Every other field is cast when it can be
//! and otherwise falls back to its declared default, so stricter validation can
//! later be swapped in here without touching callers.

use super::registry::{
    self, DefaultValue, FieldDescriptor, TAVILY_GET_SEARCH_CONTEXT, TAVILY_QNA_SEARCH, TAVILY_SEARCH,
    ToolDescriptor,
};
use crate::cache;
use crate::config::{Config, split_list};
use crate::error::{Result, TavilyError};
use crate::format::ResponseFormat;
use crate::tavily::{SearchDepth, SearchRequest, TimeRange, Topic};
use serde_json::{Map, Value};
use tracing::debug;

/// Deployment-level domain lists used when the caller supplies none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentDefaults {
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
}

impl From<&Config> for DeploymentDefaults {
    fn from(config: &Config) -> Self {
        Self {
            include_domains: config.include_domains.clone(),
            exclude_domains: config.exclude_domains.clone(),
        }
    }
}

/// Fields shared by every tool.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonParams {
    pub query: String,
    pub search_depth: SearchDepth,
    pub topic: Topic,
    pub days: u32,
    pub time_range: Option<TimeRange>,
    pub max_results: u32,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
}

impl CommonParams {
    fn request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            search_depth: self.search_depth,
            topic: self.topic,
            days: self.days,
            time_range: self.time_range,
            max_results: self.max_results,
            include_images: false,
            include_image_descriptions: false,
            include_answer: false,
            include_raw_content: false,
            include_domains: self.include_domains.clone(),
            exclude_domains: self.exclude_domains.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub common: CommonParams,
    pub include_images: bool,
    pub include_image_descriptions: bool,
    pub include_answer: bool,
    pub include_raw_content: bool,
    pub response_format: ResponseFormat,
    pub cache_ttl: u64,
    pub force_refresh: bool,
}

impl SearchParams {
    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            include_images: self.include_images,
            include_image_descriptions: self.include_image_descriptions,
            include_answer: self.include_answer,
            include_raw_content: self.include_raw_content,
            ..self.common.request()
        }
    }

    pub fn cache_key(&self) -> String {
        cache::cache_key(
            &self.common.query,
            self.common.search_depth,
            self.common.topic,
            self.include_answer,
            self.include_images,
            self.include_raw_content,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextParams {
    pub common: CommonParams,
    pub max_tokens: usize,
}

impl ContextParams {
    pub fn request(&self) -> SearchRequest {
        self.common.request()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QnaParams {
    pub common: CommonParams,
}

impl QnaParams {
    /// QnA always asks the provider for an answer.
    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            include_answer: true,
            ..self.common.request()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolParams {
    Search(SearchParams),
    Context(ContextParams),
    Qna(QnaParams),
}

/// Maps a raw argument bag to the typed record for `tool_name`.
///
/// Unknown fields are ignored.
pub fn normalize(tool_name: &str, raw: &Map<String, Value>, defaults: &DeploymentDefaults) -> Result<ToolParams> {
    let tool = registry::find(tool_name).ok_or_else(|| TavilyError::UnknownTool(tool_name.to_string()))?;
    let args = Args { tool, raw, defaults };
    let common = args.common()?;

    let params = match tool.name {
        TAVILY_SEARCH => ToolParams::Search(SearchParams {
            common,
            include_images: args.boolean("include_images"),
            include_image_descriptions: args.boolean("include_image_descriptions"),
            include_answer: args.boolean("include_answer"),
            include_raw_content: args.boolean("include_raw_content"),
            response_format: args
                .enumerated("response_format")
                .and_then(|s| ResponseFormat::parse(&s))
                .unwrap_or_default(),
            cache_ttl: args.number("cache_ttl"),
            force_refresh: args.boolean("force_refresh"),
        }),
        TAVILY_GET_SEARCH_CONTEXT => ToolParams::Context(ContextParams {
            common,
            max_tokens: args.number("max_tokens"),
        }),
        TAVILY_QNA_SEARCH => ToolParams::Qna(QnaParams { common }),
        other => return Err(TavilyError::UnknownTool(other.to_string())),
    };
    Ok(params)
}

struct Args<'a> {
    tool: &'static ToolDescriptor,
    raw: &'a Map<String, Value>,
    defaults: &'a DeploymentDefaults,
}

impl Args<'_> {
    fn common(&self) -> Result<CommonParams> {
        Ok(CommonParams {
            query: self.query()?,
            search_depth: self
                .enumerated("search_depth")
                .and_then(|s| SearchDepth::parse(&s))
                .unwrap_or_default(),
            topic: self.enumerated("topic").and_then(|s| Topic::parse(&s)).unwrap_or_default(),
            days: self.number("days"),
            time_range: self.enumerated("time_range").and_then(|s| TimeRange::parse(&s)),
            max_results: self.number("max_results"),
            include_domains: self.list("include_domains", &self.defaults.include_domains),
            exclude_domains: self.list("exclude_domains", &self.defaults.exclude_domains),
        })
    }

    fn query(&self) -> Result<String> {
        match self.raw.get("query") {
            Some(Value::String(q)) if !q.trim().is_empty() => Ok(q.trim().to_string()),
            Some(Value::String(_)) => Err(TavilyError::Validation("query cannot be empty".into())),
            Some(_) => Err(TavilyError::Validation("query must be a string".into())),
            None => Err(TavilyError::Validation("query is required".into())),
        }
    }

    fn descriptor(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.tool.field(name)
    }

    fn supplied(&self, name: &str) -> Option<&Value> {
        self.raw.get(name).filter(|v| !v.is_null())
    }

    fn lenient<T>(&self, name: &str, value: Option<T>) -> Option<T> {
        if value.is_none() && self.supplied(name).is_some() {
            debug!("{}: ignoring unusable value for {}", self.tool.name, name);
        }
        value
    }

    /// String value restricted to the field's allowed set, else its default.
    fn enumerated(&self, name: &str) -> Option<String> {
        let field = self.descriptor(name)?;
        let given = self.supplied(name).and_then(Value::as_str).map(|s| s.trim().to_lowercase());
        let given = given.filter(|s| field.allowed.is_none_or(|allowed| allowed.contains(&s.as_str())));
        self.lenient(name, given).or_else(|| match field.default {
            Some(DefaultValue::Str(s)) => Some(s.to_string()),
            _ => None,
        })
    }

    /// Non-negative number that fits `T`, else the declared default.
    fn number<T>(&self, name: &str) -> T
    where
        T: TryFrom<u64> + Default,
    {
        let given = self
            .supplied(name)
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_number)),
                Value::String(s) => s.trim().parse::<f64>().ok().and_then(whole_number),
                _ => None,
            })
            .and_then(|n| T::try_from(n).ok());
        self.lenient(name, given)
            .or_else(|| match self.descriptor(name).and_then(|f| f.default) {
                Some(DefaultValue::Number(n)) => T::try_from(n).ok(),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn boolean(&self, name: &str) -> bool {
        let given = self.supplied(name).and_then(|v| match v {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        });
        self.lenient(name, given).unwrap_or_else(|| {
            matches!(self.descriptor(name).and_then(|f| f.default), Some(DefaultValue::Bool(true)))
        })
    }

    fn list(&self, name: &str, fallback: &[String]) -> Vec<String> {
        let given = self.supplied(name).and_then(|v| match v {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            Value::String(s) => Some(split_list(s)),
            _ => None,
        });
        self.lenient(name, given).unwrap_or_else(|| fallback.to_vec())
    }
}

/// Truncates a finite, non-negative float; anything beyond `u64` is rejected.
fn whole_number(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f < u64::MAX as f64).then(|| f as u64)
}
