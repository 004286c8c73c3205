//! The four tools exposed over `tools/call`.
//!
//! Each tool takes camelCase JSON arguments naming an `ecosystem` (id or
//! alias) plus the operation's request fields. Result limits are clamped
//! to their upper bounds before the engine sees them.

use modscout_core::{
    Category, DiscoverRequest, EcosystemRegistry, IntrospectRequest, MAX_DISCOVER_RESULTS,
    MAX_INTROSPECT_DEPTH, MAX_SEARCH_RESULTS, SearchRequest, ValidateRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

pub const DISCOVER_PACKAGES: &str = "discover_packages";
pub const VALIDATE_IMPORT: &str = "validate_import";
pub const INTROSPECT_MODULE: &str = "introspect_module";
pub const SEARCH_AFFORDANCES: &str = "search_affordances";

/// A `tools/call` that cannot be dispatched. Reported as a JSON-RPC
/// `-32602` error rather than as a tool result.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: &'static str, message: String },
}

/// Entry of the `tools/list` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn ecosystem_property() -> Value {
    json!({
        "type": "string",
        "description": "Target ecosystem: javascript (typescript, js, ts, npm, node), \
                        python (py, pypi), rust (cargo, rs), go (golang) or java (maven, jvm)"
    })
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: DISCOVER_PACKAGES,
            description: "List the packages declared in the project manifest together with \
                          the ecosystem's standard library units",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "ecosystem": ecosystem_property(),
                    "searchTerm": {
                        "type": "string",
                        "description": "Case-insensitive substring filter on package names"
                    },
                    "includeDevDependencies": { "type": "boolean", "default": false },
                    "maxResults": {
                        "type": "integer",
                        "default": 50,
                        "minimum": 1,
                        "maximum": MAX_DISCOVER_RESULTS
                    }
                },
                "required": ["ecosystem"]
            }),
        },
        ToolDefinition {
            name: VALIDATE_IMPORT,
            description: "Check whether an import statement resolves to the standard library, \
                          a declared dependency or a local module",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "importStatement": {
                        "type": "string",
                        "description": "A single import statement in the ecosystem's syntax"
                    },
                    "ecosystem": ecosystem_property(),
                    "projectPath": {
                        "type": "string",
                        "description": "Directory the manifest search starts from, relative to the project root unless absolute"
                    }
                },
                "required": ["importStatement", "ecosystem"]
            }),
        },
        ToolDefinition {
            name: INTROSPECT_MODULE,
            description: "List the exports, submodules and dependencies of an installed module",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "moduleName": { "type": "string" },
                    "ecosystem": ecosystem_property(),
                    "includePrivate": { "type": "boolean", "default": false },
                    "maxDepth": {
                        "type": "integer",
                        "default": 2,
                        "minimum": 0,
                        "maximum": MAX_INTROSPECT_DEPTH
                    }
                },
                "required": ["moduleName", "ecosystem"]
            }),
        },
        ToolDefinition {
            name: SEARCH_AFFORDANCES,
            description: "Rank available packages by relevance to a described functionality",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "ecosystem": ecosystem_property(),
                    "category": {
                        "type": "string",
                        "enum": ["ui", "data", "network", "testing", "build", "utility", "all"]
                    },
                    "maxResults": {
                        "type": "integer",
                        "default": 10,
                        "minimum": 1,
                        "maximum": MAX_SEARCH_RESULTS
                    }
                },
                "required": ["query", "ecosystem"]
            }),
        },
    ]
}

#[derive(Deserialize)]
struct DiscoverArgs {
    ecosystem: String,
    #[serde(flatten)]
    request: DiscoverRequest,
}

#[derive(Deserialize)]
struct ValidateArgs {
    ecosystem: String,
    #[serde(flatten)]
    request: ValidateRequest,
}

#[derive(Deserialize)]
struct IntrospectArgs {
    ecosystem: String,
    #[serde(flatten)]
    request: IntrospectRequest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArgs {
    ecosystem: String,
    query: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    max_results: Option<usize>,
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Discover {
        ecosystem: String,
        request: DiscoverRequest,
    },
    Validate {
        ecosystem: String,
        request: ValidateRequest,
    },
    Introspect {
        ecosystem: String,
        request: IntrospectRequest,
    },
    Search {
        ecosystem: String,
        request: SearchRequest,
    },
}

fn arguments<T: serde::de::DeserializeOwned>(
    tool: &'static str,
    arguments: Value,
) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool,
        message: e.to_string(),
    })
}

impl ToolCall {
    /// Parses `tools/call` parameters for tool `name`, clamping limits.
    pub fn parse(name: &str, args: Value) -> Result<Self, ToolError> {
        match name {
            DISCOVER_PACKAGES => {
                let DiscoverArgs {
                    ecosystem,
                    mut request,
                } = arguments(DISCOVER_PACKAGES, args)?;
                request.max_results = request.max_results.clamp(1, MAX_DISCOVER_RESULTS);
                Ok(Self::Discover { ecosystem, request })
            }
            VALIDATE_IMPORT => {
                let ValidateArgs { ecosystem, request } = arguments(VALIDATE_IMPORT, args)?;
                Ok(Self::Validate { ecosystem, request })
            }
            INTROSPECT_MODULE => {
                let IntrospectArgs {
                    ecosystem,
                    mut request,
                } = arguments(INTROSPECT_MODULE, args)?;
                request.max_depth = request.max_depth.min(MAX_INTROSPECT_DEPTH);
                Ok(Self::Introspect { ecosystem, request })
            }
            SEARCH_AFFORDANCES => {
                let args: SearchArgs = arguments(SEARCH_AFFORDANCES, args)?;
                let category = match args.category.as_deref() {
                    Some(filter) => Category::parse_filter(filter).map_err(|e| {
                        ToolError::InvalidArguments {
                            tool: SEARCH_AFFORDANCES,
                            message: e.to_string(),
                        }
                    })?,
                    None => None,
                };
                let mut request = SearchRequest::new(args.query);
                request.category = category;
                if let Some(max) = args.max_results {
                    request.max_results = max;
                }
                request.max_results = request.max_results.clamp(1, MAX_SEARCH_RESULTS);
                Ok(Self::Search {
                    ecosystem: args.ecosystem,
                    request,
                })
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    pub fn ecosystem(&self) -> &str {
        match self {
            Self::Discover { ecosystem, .. }
            | Self::Validate { ecosystem, .. }
            | Self::Introspect { ecosystem, .. }
            | Self::Search { ecosystem, .. } => ecosystem,
        }
    }

    /// Runs the call against the engine registered for its ecosystem.
    ///
    /// Fails only for an unknown ecosystem; engines report everything else
    /// inside their results.
    pub async fn execute(&self, registry: &EcosystemRegistry) -> modscout_core::Result<Value> {
        let ecosystem = registry.resolve(self.ecosystem())?;
        let value = match self {
            Self::Discover { request, .. } => {
                serde_json::to_value(ecosystem.discover_packages(request).await)?
            }
            Self::Validate { request, .. } => {
                serde_json::to_value(ecosystem.validate_import(request).await)?
            }
            Self::Introspect { request, .. } => {
                serde_json::to_value(ecosystem.introspect_module(request).await)?
            }
            Self::Search { request, .. } => {
                serde_json::to_value(ecosystem.search_affordances(request).await)?
            }
        };
        Ok(value)
    }
}
