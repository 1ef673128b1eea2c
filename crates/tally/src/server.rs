//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the text-analysis engine over stdio so AI assistants can request
//! the same statistics the CLI prints.
//!
//! The server is a presentation layer only. Every `#[tool]` method delegates to
//! `tally_core` and serializes the result as JSON text content.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use tally_core::limit::deserialize_lenient;
use tally_core::{
    CharLimit, LimitStatus, build_display_state, compute_frequencies, compute_metrics,
    limit_status, would_exceed,
};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `compute_metrics` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ComputeMetricsParams {
    /// The text to analyze.
    pub text: String,
    /// Count characters without whitespace.
    #[serde(default)]
    pub exclude_whitespace: bool,
}

/// Parameters for the `letter_frequencies` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LetterFrequenciesParams {
    /// The text to analyze.
    pub text: String,
}

/// Parameters for the `letter_density` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LetterDensityParams {
    /// The text to analyze.
    pub text: String,
    /// Return every letter instead of the top five.
    #[serde(default)]
    pub show_all_letters: bool,
}

/// Parameters for the `check_limit` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CheckLimitParams {
    /// The current text.
    pub text: String,
    /// Character limit. A number or numeric string; anything else means no limit.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub limit: Option<CharLimit>,
    /// Text about to be appended, checked against the limit.
    pub inserted: Option<String>,
    /// Count characters without whitespace.
    #[serde(default)]
    pub exclude_whitespace: bool,
}

/// Result of the `check_limit` tool.
#[derive(Debug, Serialize)]
struct LimitReport {
    #[serde(flatten)]
    status: LimitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    would_exceed: Option<bool>,
}

/// MCP server exposing the text-analysis engine.
#[derive(Clone)]
pub struct TallyServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    max_input_bytes: Option<usize>,
}

impl Default for TallyServer {
    fn default() -> Self {
        Self::new(Some(tally_core::DEFAULT_MAX_INPUT_BYTES))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl TallyServer {
    /// Create a server that rejects text larger than `max_input_bytes`.
    pub fn new(max_input_bytes: Option<usize>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            max_input_bytes,
        }
    }

    fn check_input(&self, text: &str) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            )),
            _ => Ok(()),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        if params.format == "json" {
            return to_json(&serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "description": env!("CARGO_PKG_DESCRIPTION"),
            }));
        }

        let text = format!(
            "{} v{}\n{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_DESCRIPTION"),
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Character, word, sentence counts and reading time.
    #[tool(
        description = "Count characters, words and sentences in text and estimate reading time in minutes (200 words per minute)."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn compute_metrics(
        &self,
        Parameters(params): Parameters<ComputeMetricsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_input(&params.text)?;
        tracing::debug!(
            tool = "compute_metrics",
            exclude_whitespace = params.exclude_whitespace,
            "executing MCP tool"
        );

        let metrics = compute_metrics(&params.text, params.exclude_whitespace);

        tracing::info!(
            tool = "compute_metrics",
            words = metrics.word_count,
            "MCP tool completed"
        );
        to_json(&metrics)
    }

    /// Per-letter counts in first-occurrence order.
    #[tool(
        description = "Count each letter A-Z (case-insensitive) in order of first appearance, with the total letter count."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn letter_frequencies(
        &self,
        Parameters(params): Parameters<LetterFrequenciesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_input(&params.text)?;
        tracing::debug!(tool = "letter_frequencies", "executing MCP tool");

        let table = compute_frequencies(&params.text);

        tracing::info!(
            tool = "letter_frequencies",
            total = table.total(),
            "MCP tool completed"
        );
        to_json(&table)
    }

    /// Ranked letter density with percentages.
    #[tool(
        description = "Rank letters by frequency with percentages. Returns the top five unless show_all_letters is set."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn letter_density(
        &self,
        Parameters(params): Parameters<LetterDensityParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_input(&params.text)?;
        tracing::debug!(
            tool = "letter_density",
            show_all = params.show_all_letters,
            "executing MCP tool"
        );

        let state = build_display_state(&params.text, params.show_all_letters);

        tracing::info!(
            tool = "letter_density",
            entries = state.entries().len(),
            "MCP tool completed"
        );
        to_json(&state)
    }

    /// Compare text against a character limit.
    #[tool(
        description = "Check text against a character limit. Optionally reports whether appending `inserted` would exceed it."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn check_limit(
        &self,
        Parameters(params): Parameters<CheckLimitParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_input(&params.text)?;
        tracing::debug!(tool = "check_limit", limit = ?params.limit, "executing MCP tool");

        let count = compute_metrics(&params.text, params.exclude_whitespace).char_count;
        let status = limit_status(count, params.limit);
        let report = LimitReport {
            warning: status.warning(),
            would_exceed: params.inserted.as_deref().map(|inserted| {
                would_exceed(
                    &params.text,
                    inserted,
                    params.exclude_whitespace,
                    params.limit,
                )
            }),
            status,
        };

        tracing::info!(
            tool = "check_limit",
            reached = report.status.is_reached(),
            "MCP tool completed"
        );
        to_json(&report)
    }
}

#[tool_handler]
impl ServerHandler for TallyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use the tools to count characters, words and sentences, \
                 estimate reading time, and rank letter density.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
