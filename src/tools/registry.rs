use serde_json::{Map, Value, json};

pub const TAVILY_SEARCH: &str = "tavily_search";
pub const TAVILY_GET_SEARCH_CONTEXT: &str = "tavily_get_search_context";
pub const TAVILY_QNA_SEARCH: &str = "tavily_qna_search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    StringArray,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Str(&'static str),
    Number(u64),
    Bool(bool),
    EmptyList,
}

impl DefaultValue {
    pub fn to_json(self) -> Value {
        match self {
            DefaultValue::Str(s) => Value::from(s),
            DefaultValue::Number(n) => Value::from(n),
            DefaultValue::Bool(b) => Value::from(b),
            DefaultValue::EmptyList => Value::Array(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub field_type: FieldType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub allowed: Option<&'static [&'static str]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: &'static [FieldDescriptor],
}

impl ToolDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.schema.iter().find(|f| f.name == name)
    }

    /// Renders the schema as a JSON Schema object for capability discovery.
    ///
    /// Built from the descriptors rather than derived from the parameter
    /// structs: the normalizer reads the same defaults and enum sets, so the
    /// advertised schema and the applied defaults cannot drift apart.
    pub fn input_schema(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in self.schema {
            let mut prop = match field.field_type {
                FieldType::String => json!({ "type": "string" }),
                FieldType::Number => json!({ "type": "number" }),
                FieldType::Boolean => json!({ "type": "boolean" }),
                FieldType::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            };
            prop["description"] = Value::from(field.description);
            if let Some(default) = field.default {
                prop["default"] = default.to_json();
            }
            if let Some(allowed) = field.allowed {
                prop["enum"] = Value::from(allowed.to_vec());
            }
            if field.required {
                required.push(Value::from(field.name));
            }
            properties.insert(field.name.to_string(), prop);
        }

        let mut schema = Map::new();
        schema.insert("type".into(), Value::from("object"));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), Value::Array(required));
        schema
    }
}

const SEARCH_DEPTHS: &[&str] = &["basic", "advanced"];
const TOPICS: &[&str] = &["general", "news"];
const TIME_RANGES: &[&str] = &["day", "week", "month", "year", "d", "w", "m", "y"];
const RESPONSE_FORMATS: &[&str] = &["text", "json", "markdown"];

const fn field(
    name: &'static str,
    field_type: FieldType,
    description: &'static str,
    default: Option<DefaultValue>,
    allowed: Option<&'static [&'static str]>,
) -> FieldDescriptor {
    FieldDescriptor { name, field_type, description, required: false, default, allowed }
}

const QUERY: FieldDescriptor = FieldDescriptor {
    name: "query",
    field_type: FieldType::String,
    description: "Search query",
    required: true,
    default: None,
    allowed: None,
};

const fn search_depth(default: &'static str) -> FieldDescriptor {
    field(
        "search_depth",
        FieldType::String,
        "The depth of the search. It can be 'basic' or 'advanced'",
        Some(DefaultValue::Str(default)),
        Some(SEARCH_DEPTHS),
    )
}

const TOPIC: FieldDescriptor = field(
    "topic",
    FieldType::String,
    "The category of the search. Determines which agent will be used",
    Some(DefaultValue::Str("general")),
    Some(TOPICS),
);

const DAYS: FieldDescriptor = field(
    "days",
    FieldType::Number,
    "The number of days back from the current date to include in the results. Only applies to the 'news' topic",
    Some(DefaultValue::Number(3)),
    None,
);

const TIME_RANGE: FieldDescriptor = field(
    "time_range",
    FieldType::String,
    "The time range back from the current date to include in the results",
    None,
    Some(TIME_RANGES),
);

const MAX_RESULTS: FieldDescriptor = field(
    "max_results",
    FieldType::Number,
    "The maximum number of search results to return",
    Some(DefaultValue::Number(5)),
    None,
);

const INCLUDE_DOMAINS: FieldDescriptor = field(
    "include_domains",
    FieldType::StringArray,
    "A list of domains to specifically include in the search results",
    Some(DefaultValue::EmptyList),
    None,
);

const EXCLUDE_DOMAINS: FieldDescriptor = field(
    "exclude_domains",
    FieldType::StringArray,
    "A list of domains to specifically exclude from the search results",
    Some(DefaultValue::EmptyList),
    None,
);

const SEARCH_FIELDS: &[FieldDescriptor] = &[
    QUERY,
    search_depth("basic"),
    TOPIC,
    DAYS,
    TIME_RANGE,
    MAX_RESULTS,
    field(
        "include_images",
        FieldType::Boolean,
        "Include a list of query-related images in the response",
        Some(DefaultValue::Bool(false)),
        None,
    ),
    field(
        "include_image_descriptions",
        FieldType::Boolean,
        "Include a description for each returned image. Requires include_images",
        Some(DefaultValue::Bool(false)),
        None,
    ),
    field(
        "include_answer",
        FieldType::Boolean,
        "Include a short answer to the original query generated from the results",
        Some(DefaultValue::Bool(false)),
        None,
    ),
    field(
        "include_raw_content",
        FieldType::Boolean,
        "Include the cleaned and parsed HTML content of each result",
        Some(DefaultValue::Bool(false)),
        None,
    ),
    INCLUDE_DOMAINS,
    EXCLUDE_DOMAINS,
    field(
        "response_format",
        FieldType::String,
        "Output format of the results",
        Some(DefaultValue::Str("text")),
        Some(RESPONSE_FORMATS),
    ),
    field(
        "cache_ttl",
        FieldType::Number,
        "Seconds a fresh result stays cached",
        Some(DefaultValue::Number(3600)),
        None,
    ),
    field(
        "force_refresh",
        FieldType::Boolean,
        "Skip the cache lookup and fetch fresh results",
        Some(DefaultValue::Bool(false)),
        None,
    ),
];

const CONTEXT_FIELDS: &[FieldDescriptor] = &[
    QUERY,
    search_depth("advanced"),
    TOPIC,
    DAYS,
    TIME_RANGE,
    MAX_RESULTS,
    field(
        "max_tokens",
        FieldType::Number,
        "The maximum length of the returned context, counted in characters",
        Some(DefaultValue::Number(4000)),
        None,
    ),
    INCLUDE_DOMAINS,
    EXCLUDE_DOMAINS,
];

const QNA_FIELDS: &[FieldDescriptor] = &[
    QUERY,
    search_depth("advanced"),
    TOPIC,
    DAYS,
    TIME_RANGE,
    MAX_RESULTS,
    INCLUDE_DOMAINS,
    EXCLUDE_DOMAINS,
];

static TOOLS: [ToolDescriptor; 3] = [
    ToolDescriptor {
        name: TAVILY_SEARCH,
        description: "Performs a web search using the Tavily Search API, optimized for LLMs. \
            Use this for broad information gathering, recent events, or when you need diverse web sources. \
            Supports search depth, topic selection, time filtering, domain filtering and images. \
            Results are cached per query; set force_refresh to bypass the cache.",
        schema: SEARCH_FIELDS,
    },
    ToolDescriptor {
        name: TAVILY_GET_SEARCH_CONTEXT,
        description: "Generates a context string from the search results for a query, for RAG applications. \
            The contents of the results are joined and cut to max_tokens characters.",
        schema: CONTEXT_FIELDS,
    },
    ToolDescriptor {
        name: TAVILY_QNA_SEARCH,
        description: "Performs a search and returns only the provider's direct answer to the question. \
            Suitable for short factual questions.",
        schema: QNA_FIELDS,
    },
];

/// All tools in advertised order.
pub fn list() -> &'static [ToolDescriptor] {
    &TOOLS
}

pub fn find(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(tool: &ToolDescriptor) -> Vec<&'static str> {
        tool.schema.iter().map(|f| f.name).collect()
    }

    #[test]
    fn lists_three_tools_in_fixed_order() {
        let names: Vec<_> = list().iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["tavily_search", "tavily_get_search_context", "tavily_qna_search"]);
    }

    #[test]
    fn search_schema_enumerates_every_parameter() {
        let tool = find(TAVILY_SEARCH).unwrap();
        assert_eq!(
            field_names(tool),
            vec![
                "query",
                "search_depth",
                "topic",
                "days",
                "time_range",
                "max_results",
                "include_images",
                "include_image_descriptions",
                "include_answer",
                "include_raw_content",
                "include_domains",
                "exclude_domains",
                "response_format",
                "cache_ttl",
                "force_refresh",
            ]
        );
        assert_eq!(tool.field("search_depth").unwrap().default, Some(DefaultValue::Str("basic")));
        assert_eq!(tool.field("max_results").unwrap().default, Some(DefaultValue::Number(5)));
        assert_eq!(tool.field("cache_ttl").unwrap().default, Some(DefaultValue::Number(3600)));
    }

    #[test]
    fn context_and_qna_default_to_advanced_depth() {
        for name in [TAVILY_GET_SEARCH_CONTEXT, TAVILY_QNA_SEARCH] {
            let tool = find(name).unwrap();
            assert_eq!(tool.field("search_depth").unwrap().default, Some(DefaultValue::Str("advanced")));
            assert!(tool.field("cache_ttl").is_none());
            assert!(tool.field("response_format").is_none());
        }
        assert!(find(TAVILY_GET_SEARCH_CONTEXT).unwrap().field("max_tokens").is_some());
        assert!(find(TAVILY_QNA_SEARCH).unwrap().field("max_tokens").is_none());
    }

    #[test]
    fn input_schema_is_json_schema() {
        let schema = find(TAVILY_SEARCH).unwrap().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["query"]));
        let props = &schema["properties"];
        assert_eq!(props["query"]["type"], "string");
        assert_eq!(props["search_depth"]["enum"], json!(["basic", "advanced"]));
        assert_eq!(props["include_domains"]["type"], "array");
        assert_eq!(props["include_domains"]["default"], json!([]));
        assert_eq!(props["force_refresh"]["default"], false);
        assert!(props["time_range"].get("default").is_none());
    }

    #[test]
    fn unknown_tool_is_not_found() {
        assert!(find("tavily_extract").is_none());
    }
}
