//! Tool handlers for extraction and citation.

use std::sync::Arc;

use serde_json::Value;

use super::tools::ToolHandler;
use crate::citation::{
    batch_generate_citations, describe_rules, generate_citation, UNSUPPORTED_CITATION,
};
use crate::extract::{MetadataExtractor, EXTRACTION_FAILED};
use crate::models::CitationRequest;

/// Read a required string argument
fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing '{}' parameter", key))
}

/// Read the style argument, falling back to the configured default
fn style_arg(args: &Value, default_style: &str) -> String {
    args.get("style")
        .and_then(|v| v.as_str())
        .unwrap_or(default_style)
        .to_string()
}

/// Handler for extracting metadata from a single URL
#[derive(Debug)]
pub struct ExtractMetadataHandler {
    pub extractor: Arc<MetadataExtractor>,
}

#[async_trait::async_trait]
impl ToolHandler for ExtractMetadataHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let url = required_str(&args, "url")?;

        match self.extractor.extract(url).await {
            Some(metadata) => serde_json::to_value(metadata).map_err(|e| e.to_string()),
            None => Err(format!(
                "{}. Please enter the details manually.",
                EXTRACTION_FAILED
            )),
        }
    }
}

/// Handler for extracting metadata from several URLs
#[derive(Debug)]
pub struct BatchExtractMetadataHandler {
    pub extractor: Arc<MetadataExtractor>,
}

#[async_trait::async_trait]
impl ToolHandler for BatchExtractMetadataHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let urls: Vec<String> = args
            .get("urls")
            .and_then(|v| v.as_array())
            .ok_or("Missing 'urls' parameter")?
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();

        let results = self.extractor.batch_extract(&urls).await;
        Ok(serde_json::json!({ "results": results }))
    }
}

/// Handler for generating one citation
#[derive(Debug)]
pub struct GenerateCitationHandler {
    pub default_style: String,
}

#[async_trait::async_trait]
impl ToolHandler for GenerateCitationHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let style = style_arg(&args, &self.default_style);
        let source_type = required_str(&args, "sourceType")?;

        let fields = match args.get("fields") {
            Some(fields @ Value::Object(_)) => fields.clone(),
            Some(_) => return Err("'fields' must be an object".to_string()),
            None => {
                let request: CitationRequest =
                    serde_json::from_value(args.clone()).map_err(|e| e.to_string())?;
                Value::Object(request.fields)
            }
        };

        let generated =
            generate_citation(source_type, &style, fields).map_err(|e| e.to_string())?;
        if generated.citation == UNSUPPORTED_CITATION {
            tracing::debug!("Style {} has no rules for {}", style, source_type);
        }

        serde_json::to_value(generated).map_err(|e| e.to_string())
    }
}

/// Handler for generating citations for several items
#[derive(Debug)]
pub struct BatchGenerateCitationsHandler {
    pub default_style: String,
}

#[async_trait::async_trait]
impl ToolHandler for BatchGenerateCitationsHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let style = style_arg(&args, &self.default_style);
        let items = args.get("items").ok_or("Missing 'items' parameter")?;
        let items: Vec<CitationRequest> =
            serde_json::from_value(items.clone()).map_err(|e| format!("Invalid items: {}", e))?;

        let results = batch_generate_citations(&items, &style);
        Ok(serde_json::json!({ "results": results }))
    }
}

/// Handler for describing a citation rule
#[derive(Debug)]
pub struct CitationRulesHandler {
    pub default_style: String,
}

#[async_trait::async_trait]
impl ToolHandler for CitationRulesHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let style = style_arg(&args, &self.default_style);
        let source_type = required_str(&args, "sourceType")?;

        let description = describe_rules(&style, source_type).map_err(|e| e.to_string())?;
        serde_json::to_value(description).map_err(|e| e.to_string())
    }
}
