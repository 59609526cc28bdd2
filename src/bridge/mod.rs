//! The bridge request handler.
//!
//! Turns one request into one response: resolve the template document,
//! load it, pick the named definition, execute it with the caller's
//! variables, and report the text. Every failure becomes a failure
//! response; nothing is retried and nothing partial is returned.

use crate::config::BridgeConfig;
use crate::document::{TemplateDocument, resolve_template_path};
use crate::engine::{Invocation, TemplateEngine, build_engine};
use crate::error::Result;
use crate::protocol::{BridgeRequest, BridgeResponse};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

/// Request handler bound to a project root and an engine.
pub struct Bridge {
    project_root: PathBuf,
    default_pdl_file: PathBuf,
    engine: Box<dyn TemplateEngine>,
}

impl Bridge {
    pub fn new(
        project_root: PathBuf,
        default_pdl_file: PathBuf,
        engine: Box<dyn TemplateEngine>,
    ) -> Self {
        Self {
            project_root,
            default_pdl_file,
            engine,
        }
    }

    /// Build a bridge from a validated config.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        let project_root = config.effective_project_root()?;
        let engine = build_engine(&config.engine, &project_root);
        debug!(
            project_root = %project_root.display(),
            engine = engine.name(),
            "bridge configured"
        );
        Ok(Self::new(
            project_root,
            config.default_pdl_file.clone(),
            engine,
        ))
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Handle raw request text. Always produces exactly one response.
    pub fn handle(&self, input: &str) -> BridgeResponse {
        let result = BridgeRequest::from_json(input).and_then(|request| self.render(&request));
        match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error_type = %err.kind(), "request failed: {}", err);
                BridgeResponse::failure(&err)
            }
        }
    }

    /// Render a decoded request.
    pub fn render(&self, request: &BridgeRequest) -> Result<BridgeResponse> {
        let pdl_file = self.resolve(request.pdl_file.as_deref());
        debug!(
            template = %request.template,
            pdl_file = %pdl_file.display(),
            variables = request.variables.len(),
            "rendering template"
        );

        let document = TemplateDocument::load(&pdl_file)?;
        let definition = document.definition(&request.template)?;

        let content = self.engine.execute(&Invocation {
            template: &request.template,
            pdl_file: &pdl_file,
            definition,
            variables: &request.variables,
        })?;

        Ok(BridgeResponse::rendered(
            content,
            request.template.clone(),
            request.variable_names(),
        ))
    }

    /// List the templates defined in a document.
    pub fn list_templates(&self, pdl_file: Option<&Path>) -> Result<BridgeResponse> {
        let pdl_file = self.resolve(pdl_file);
        let document = TemplateDocument::load(&pdl_file)?;
        Ok(BridgeResponse::listing(
            document.path().display().to_string(),
            document.template_names(),
        ))
    }

    /// Resolve a requested document path, falling back to the default.
    fn resolve(&self, pdl_file: Option<&Path>) -> PathBuf {
        let pdl_file = pdl_file.unwrap_or(self.default_pdl_file.as_path());
        resolve_template_path(&self.project_root, pdl_file)
    }
}
