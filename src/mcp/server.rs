//! MCP server implementation using pmcp (Pragmatic AI's rust-mcp-sdk).
//!
//! Exposes extraction and citation tools over stdio or streamable HTTP.

use crate::config::Config;
use crate::extract::MetadataExtractor;
use crate::mcp::tools::{Tool, ToolRegistry};
use async_trait::async_trait;
use pmcp::{
    server::streamable_http_server::StreamableHttpServer, Error, RequestHandlerExtra, Server,
    ServerCapabilities, ToolHandler, ToolInfo,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// The MCP server for Cite Master
#[derive(Debug, Clone)]
pub struct McpServer {
    server: Arc<Mutex<Server>>,
    tool_names: Vec<String>,
}

impl McpServer {
    /// Create a new MCP server around an extractor
    pub fn new(extractor: MetadataExtractor, default_style: &str) -> Result<Self, pmcp::Error> {
        let registry = ToolRegistry::new(Arc::new(extractor), default_style);

        let mut tools: Vec<Tool> = registry.all().into_iter().cloned().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        let tool_names = tools.iter().map(|t| t.name.clone()).collect();

        let server = tools
            .into_iter()
            .fold(
                Server::builder()
                    .name("cite-master")
                    .version(env!("CARGO_PKG_VERSION"))
                    .capabilities(ServerCapabilities::default()),
                |builder, tool| builder.tool(tool.name.clone(), PmcpTool(tool)),
            )
            .build()?;

        Ok(Self {
            server: Arc::new(Mutex::new(server)),
            tool_names,
        })
    }

    /// Create a server from application configuration
    pub fn from_config(config: &Config) -> Result<Self, pmcp::Error> {
        let extractor = MetadataExtractor::new(&config.extractor)
            .map_err(|e| Error::internal(format!("Failed to create extractor: {}", e)))?;
        Self::new(extractor, &config.citation.default_style)
    }

    /// Names of the registered tools, sorted
    pub fn tool_names(&self) -> &[String] {
        &self.tool_names
    }

    /// Run the server in stdio mode
    pub async fn run(self) -> Result<(), pmcp::Error> {
        tracing::info!(
            "Starting MCP server in stdio mode with {} tools",
            self.tool_names.len()
        );

        // run_stdio() needs the Server by value
        let server = Arc::try_unwrap(self.server)
            .map_err(|_| Error::internal("MCP server is still shared"))?
            .into_inner();

        server.run_stdio().await
    }

    /// Run the server in streamable HTTP mode, returning the bound address
    pub async fn run_http(&self, addr: &str) -> Result<(SocketAddr, JoinHandle<()>), pmcp::Error> {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| Error::invalid_params(format!("Invalid address {}: {}", addr, e)))?;

        tracing::info!("Starting MCP server in HTTP mode on {}", socket_addr);
        StreamableHttpServer::new(socket_addr, self.server.clone())
            .start()
            .await
    }
}

/// A registry tool as seen by pmcp
#[derive(Clone)]
struct PmcpTool(Tool);

#[async_trait]
impl ToolHandler for PmcpTool {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        self.0.handler.execute(args).await.map_err(|e| {
            tracing::warn!("Tool {} failed: {}", self.0.name, e);
            Error::internal(&e)
        })
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.0.name.clone(),
            Some(self.0.description.clone()),
            self.0.input_schema.clone(),
        ))
    }
}
