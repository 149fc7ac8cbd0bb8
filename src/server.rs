use crate::cache::ResultCache;
use crate::config::Config;
use crate::dispatch::{Dispatcher, ToolOutput};
use crate::error::{Result, TavilyError};
use crate::tavily::TavilyClient;
use crate::tools::{self, DeploymentDefaults};

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorCode, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler};
use std::sync::Arc;

#[derive(Clone)]
pub struct TavilySearchServer {
    dispatcher: Arc<Dispatcher<TavilyClient>>,
}

impl TavilySearchServer {
    pub fn new(config: &Config, cache: Arc<ResultCache>) -> Result<Self> {
        let client = TavilyClient::new(config)?;
        let dispatcher = Dispatcher::new(client, cache, DeploymentDefaults::from(config));
        Ok(Self { dispatcher: Arc::new(dispatcher) })
    }
}

/// Registry descriptors in the shape MCP clients expect.
fn tool_list() -> Vec<Tool> {
    tools::registry::list()
        .iter()
        .map(|t| Tool::new(t.name, t.description, Arc::new(t.input_schema())))
        .collect()
}

fn into_call_result(outcome: Result<ToolOutput>) -> std::result::Result<CallToolResult, McpError> {
    match outcome {
        Ok(ToolOutput { text, is_error: false }) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Ok(ToolOutput { text, is_error: true }) => Ok(CallToolResult::error(vec![Content::text(text)])),
        Err(e @ TavilyError::UnknownTool(_)) => Err(McpError::new(ErrorCode::METHOD_NOT_FOUND, e.to_string(), None)),
        Err(e @ TavilyError::InvalidRequest(_)) => Err(McpError::invalid_params(e.to_string(), None)),
        Err(e) => Err(McpError::internal_error(e.to_string(), None)),
    }
}

impl ServerHandler for TavilySearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "tavily-search".into(),
                title: None,
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Web search, RAG context and direct answers backed by the Tavily Search API.".into(),
            ),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(tool_list())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let args = request.arguments.map(serde_json::Value::Object).unwrap_or_default();
            let outcome = self.dispatcher.dispatch(&request.name, &args).await;
            into_call_result(outcome)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(result: &CallToolResult) -> String {
        result.content.first().and_then(|c| c.as_text()).map(|t| t.text.to_string()).unwrap_or_default()
    }

    #[test]
    fn advertises_registry_tools_in_order() {
        let tools = tool_list();
        let names: Vec<_> = tools.iter().map(|t| t.name.to_string()).collect();
        assert_eq!(names, vec!["tavily_search", "tavily_get_search_context", "tavily_qna_search"]);
        assert_eq!(tools[0].input_schema["required"], serde_json::json!(["query"]));
        assert!(tools[1].input_schema["properties"].get("max_tokens").is_some());
    }

    #[test]
    fn tool_output_maps_to_call_result() {
        let ok = into_call_result(Ok(ToolOutput { text: "done".into(), is_error: false })).unwrap();
        assert_eq!(ok.is_error, Some(false));
        assert_eq!(text_of(&ok), "done");

        let failed = into_call_result(Ok(ToolOutput { text: "Error: boom".into(), is_error: true })).unwrap();
        assert_eq!(failed.is_error, Some(true));
        assert_eq!(text_of(&failed), "Error: boom");
    }

    #[test]
    fn routing_failures_are_protocol_errors() {
        let err = into_call_result(Err(TavilyError::UnknownTool("nope".into()))).unwrap_err();
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);

        let err = into_call_result(Err(TavilyError::InvalidRequest("bad".into()))).unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }
}
