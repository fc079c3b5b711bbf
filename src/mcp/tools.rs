//! Tool definitions and the registry the MCP server is built from.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::extract::MetadataExtractor;

pub use super::handlers::{
    BatchExtractMetadataHandler, BatchGenerateCitationsHandler, CitationRulesHandler,
    ExtractMetadataHandler, GenerateCitationHandler,
};

/// A named tool with its argument schema and handler
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "generate_citation")
    pub name: String,

    /// Shown to MCP clients in `tools/list`
    pub description: String,

    /// JSON Schema the client validates arguments against
    pub input_schema: serde_json::Value,

    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Executes one tool call, returning a JSON result or an error message
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Tools keyed by name
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry holding the extraction and citation tools
    pub fn new(extractor: Arc<MetadataExtractor>, default_style: &str) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };
        registry.register_extraction_tools(&extractor);
        registry.register_citation_tools(default_style);
        registry
    }

    fn register_extraction_tools(&mut self, extractor: &Arc<MetadataExtractor>) {
        self.register(Tool {
            name: "extract_metadata".to_string(),
            description: "Fetch a web page and extract its title, author, publication date and publisher. Empty values mean the field should be filled in manually.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "Page URL (http or https)"
                    }
                },
                "required": ["url"]
            }),
            handler: Arc::new(ExtractMetadataHandler {
                extractor: extractor.clone(),
            }),
        });

        self.register(Tool {
            name: "batch_extract_metadata".to_string(),
            description: "Extract metadata from several web pages. Results are returned in request order with a per-URL success flag.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "urls": {
                        "type": "array",
                        "description": "Page URLs",
                        "items": { "type": "string" }
                    }
                },
                "required": ["urls"]
            }),
            handler: Arc::new(BatchExtractMetadataHandler {
                extractor: extractor.clone(),
            }),
        });
    }

    fn register_citation_tools(&mut self, default_style: &str) {
        let style_schema = serde_json::json!({
            "type": "string",
            "description": format!("Citation style (default: '{}')", default_style),
            "enum": ["APA", "MLA"]
        });
        let source_type_schema = serde_json::json!({
            "type": "string",
            "description": "Kind of cited work",
            "enum": ["website", "book", "journal"]
        });

        self.register(Tool {
            name: "generate_citation".to_string(),
            description: "Format a citation. Website fields: author, date, title, publisher, url. Book fields: authors, title, year, publisher. Journal fields: authors, title, journal, volume, issue, year, pages, doi.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "sourceType": source_type_schema,
                    "style": style_schema,
                    "fields": {
                        "type": "object",
                        "description": "Source fields; may also be given at the top level"
                    }
                },
                "required": ["sourceType"]
            }),
            handler: Arc::new(GenerateCitationHandler {
                default_style: default_style.to_string(),
            }),
        });

        self.register(Tool {
            name: "batch_generate_citations".to_string(),
            description: "Format several citations in one style. Each item succeeds or fails independently.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "items": {
                        "type": "array",
                        "description": "Items with a 'sourceType' and their source fields",
                        "items": { "type": "object" }
                    },
                    "style": style_schema
                },
                "required": ["items"]
            }),
            handler: Arc::new(BatchGenerateCitationsHandler {
                default_style: default_style.to_string(),
            }),
        });

        self.register(Tool {
            name: "citation_rules".to_string(),
            description: "Describe the field order and formatting guidelines for a style and source type.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "sourceType": source_type_schema,
                    "style": style_schema
                },
                "required": ["sourceType"]
            }),
            handler: Arc::new(CitationRulesHandler {
                default_style: default_style.to_string(),
            }),
        });
    }

    /// Add a tool, replacing any with the same name
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// All registered tools, in no particular order
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Look up a tool
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Dispatch a call to the named tool
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MockFetcher;

    fn registry() -> ToolRegistry {
        let extractor = MetadataExtractor::with_fetcher(Arc::new(MockFetcher::new()));
        ToolRegistry::new(Arc::new(extractor), "APA")
    }

    #[test]
    fn test_registers_all_tools() {
        let registry = registry();
        let mut names: Vec<&str> = registry.all().iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "batch_extract_metadata",
                "batch_generate_citations",
                "citation_rules",
                "extract_metadata",
                "generate_citation",
            ]
        );
    }

    #[tokio::test]
    async fn test_execute_by_name() {
        let registry = registry();
        let value = registry
            .execute(
                "generate_citation",
                serde_json::json!({"sourceType": "website", "author": "Plato"}),
            )
            .await
            .unwrap();
        assert_eq!(value["citation"], "Plato");

        assert!(registry
            .execute("search_papers", serde_json::json!({}))
            .await
            .is_err());
    }
}
