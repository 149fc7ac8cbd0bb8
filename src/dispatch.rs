use crate::cache::ResultCache;
use crate::error::{Result, TavilyError};
use crate::format;
use crate::tavily::{self, SearchBackend, SearchResult};
use crate::tools::{self, ContextParams, DeploymentDefaults, QnaParams, SearchParams, ToolParams};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Text returned to the calling agent for one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn success(text: String) -> Self {
        Self { text, is_error: false }
    }

    fn failure(err: &TavilyError) -> Self {
        Self { text: format!("Error: {err}"), is_error: true }
    }
}

/// Routes tool calls through normalization, cache, backend and formatting.
pub struct Dispatcher<B> {
    backend: B,
    cache: Arc<ResultCache>,
    defaults: DeploymentDefaults,
}

impl<B: SearchBackend> Dispatcher<B> {
    pub fn new(backend: B, cache: Arc<ResultCache>, defaults: DeploymentDefaults) -> Self {
        Self { backend, cache, defaults }
    }

    /// Runs one call.
    ///
    /// `Err` is reserved for protocol-level failures (unknown tool, arguments
    /// that are not an object). Everything else becomes an error `ToolOutput`.
    pub async fn dispatch(&self, tool_name: &str, args: &Value) -> Result<ToolOutput> {
        if tools::registry::find(tool_name).is_none() {
            return Err(TavilyError::UnknownTool(tool_name.to_string()));
        }
        let empty = serde_json::Map::new();
        let raw = match args {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(TavilyError::InvalidRequest(format!(
                    "arguments must be an object, got {}",
                    json_kind(other)
                )));
            }
        };

        debug!("Dispatching {}", tool_name);
        match self.run(tool_name, raw).await {
            Ok(text) => Ok(ToolOutput::success(text)),
            Err(e @ TavilyError::UnknownTool(_)) => Err(e),
            Err(e) => {
                warn!("{} failed: {}", tool_name, e);
                Ok(ToolOutput::failure(&e))
            }
        }
    }

    async fn run(&self, tool_name: &str, raw: &serde_json::Map<String, Value>) -> Result<String> {
        match tools::normalize(tool_name, raw, &self.defaults)? {
            ToolParams::Search(params) => self.search(&params).await,
            ToolParams::Context(params) => self.context(&params).await,
            ToolParams::Qna(params) => self.qna(&params).await,
        }
    }

    async fn search(&self, params: &SearchParams) -> Result<String> {
        let key = params.cache_key();

        let cached = if params.force_refresh { None } else { self.cache.get(&key) };
        let result = match cached {
            Some(result) => {
                debug!("Cache hit for \"{}\"", params.common.query);
                result
            }
            None => {
                debug!(
                    "Cache {} for \"{}\"",
                    if params.force_refresh { "bypassed" } else { "miss" },
                    params.common.query
                );
                let result = self.backend.search(&params.request()).await?;
                self.cache.put(key, result.clone(), params.cache_ttl);
                debug!("Cached result, {} entries", self.cache.len());
                result
            }
        };

        format::format(&result, params.response_format)
    }

    // Context and QnA results are never cached.
    async fn context(&self, params: &ContextParams) -> Result<String> {
        let result: SearchResult = self.backend.search(&params.request()).await?;
        Ok(tavily::build_context(&result, params.max_tokens))
    }

    async fn qna(&self, params: &QnaParams) -> Result<String> {
        let result = self.backend.search(&params.request()).await?;
        Ok(tavily::answer_or_fallback(&result))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
