//! Spine tool handlers

use crate::spine::store::{DirectoryReport, ExportFormat, ProjectStore};
use armature_dispatch::{Tool, ToolContext, ToolError};
use armature_protocol::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

fn default_true() -> bool {
    true
}

/// Parameters for `list-spine-projects`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsParams {
    /// Include example projects (default: true)
    #[serde(default = "default_true")]
    pub include_examples: bool,
}

/// Lists user and example projects
pub struct ListProjectsTool {
    store: Arc<ProjectStore>,
}

impl ListProjectsTool {
    /// Create the tool over a shared store
    pub fn new(store: Arc<ProjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ListProjectsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "list-spine-projects".to_string(),
            description: "Get a list of available Spine projects".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "includeExamples": {
                        "type": "boolean",
                        "description": "Include example projects in the list",
                        "default": true
                    }
                }
            }),
        }
    }

    async fn call(&self, args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: ListProjectsParams = serde_json::from_value(args)?;
        let projects = self.store.projects().await?;

        let lines: Vec<String> = projects
            .iter()
            .filter(|p| params.include_examples || !p.is_example)
            .map(|p| {
                if p.is_example {
                    format!("- {} (example)", p.name)
                } else {
                    format!("- {}", p.name)
                }
            })
            .collect();
        debug!("Listing {} of {} projects", lines.len(), projects.len());

        if lines.is_empty() {
            Ok(ToolResult::text("No projects found."))
        } else {
            Ok(ToolResult::text(format!(
                "Available Spine projects:\n{}",
                lines.join("\n")
            )))
        }
    }
}

/// Parameters for `spine-project-details`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailsParams {
    /// Project name (file stem)
    pub project_name: String,
}

/// Describes a single project
pub struct ProjectDetailsTool {
    store: Arc<ProjectStore>,
}

impl ProjectDetailsTool {
    /// Create the tool over a shared store
    pub fn new(store: Arc<ProjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ProjectDetailsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "spine-project-details".to_string(),
            description: "Get detailed information about a Spine project".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "projectName": {
                        "type": "string",
                        "description": "Name of the Spine project"
                    }
                },
                "required": ["projectName"]
            }),
        }
    }

    async fn call(&self, args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: ProjectDetailsParams = serde_json::from_value(args)?;
        let details = self.store.details(&params.project_name).await?;
        Ok(ToolResult::text(
            details.unwrap_or_else(|| "Project not found.".to_string()),
        ))
    }
}

/// Parameters for `export-spine-animation`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    /// Project to export
    pub project_name: String,
    /// json, atlas or binary (default: json)
    #[serde(default)]
    pub format: Option<String>,
    /// Output file stem (default: `<project>-export`)
    #[serde(default)]
    pub output_name: Option<String>,
}

/// Exports a project to another format
pub struct ExportAnimationTool {
    store: Arc<ProjectStore>,
}

impl ExportAnimationTool {
    /// Create the tool over a shared store
    pub fn new(store: Arc<ProjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ExportAnimationTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "export-spine-animation".to_string(),
            description: "Export Spine animation to specified format".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "projectName": {
                        "type": "string",
                        "description": "Name of the Spine project to export"
                    },
                    "format": {
                        "type": "string",
                        "description": "Export format (json, atlas, etc.)",
                        "enum": ["json", "atlas", "binary"],
                        "default": "json"
                    },
                    "outputName": {
                        "type": "string",
                        "description": "Output file name"
                    }
                },
                "required": ["projectName"]
            }),
        }
    }

    async fn call(&self, args: Value, ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: ExportParams = serde_json::from_value(args)?;
        let format_name = params.format.as_deref().unwrap_or("json");
        let format = ExportFormat::parse(format_name).ok_or_else(|| {
            ToolError::Invalid("Format must be one of: json, atlas, binary".to_string())
        })?;
        let output_name = params
            .output_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("{}-export", params.project_name));
        crate::error::single_component("output name", &output_name)?;

        let Some(project) = self.store.find(&params.project_name).await? else {
            debug!("Project not found: {}", params.project_name);
            return Ok(ToolResult::text("Animation export failed."));
        };

        ctx.commit()?;
        let path = self.store.export(&project, format, &output_name).await?;
        Ok(ToolResult::text(format!(
            "Animation successfully exported to: {}",
            path.display()
        )))
    }
}

/// Parameters for `generate-spine-animation`
#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    /// Animation name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
}

/// Creates a template skeleton and opens it in the editor
pub struct GenerateAnimationTool {
    store: Arc<ProjectStore>,
}

impl GenerateAnimationTool {
    /// Create the tool over a shared store
    pub fn new(store: Arc<ProjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GenerateAnimationTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "generate-spine-animation".to_string(),
            description: "Create a new Spine animation".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Name of the new animation"
                    },
                    "description": {
                        "type": "string",
                        "description": "Animation description"
                    }
                },
                "required": ["name"]
            }),
        }
    }

    async fn call(&self, args: Value, ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: GenerateParams = serde_json::from_value(args)?;
        let description = params
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "Generated animation".to_string());

        let now = Utc::now();
        let path = self.store.generated_path(&params.name, now).await;

        ctx.commit()?;
        self.store
            .write_generated(&path, &params.name, &description, now)
            .await?;

        let opened = self.store.open_in_editor(&path).await;
        let hint = if opened {
            "Spine editor should open automatically."
        } else {
            "Spine editor could not be opened automatically. You can manually open the file in Spine."
        };
        let text = format!(
            "Animation \"{}\" successfully created.\n\nFile location: {}\n\n{}",
            params.name,
            path.display(),
            hint
        );
        Ok(ToolResult::text(text).with_extra("filePath", path.display().to_string()))
    }
}

/// Parameters for `debug-server`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugParams {
    /// Inspect directories and the editor (default: true)
    #[serde(default = "default_true")]
    pub check_directories: bool,
}

/// Reports the server environment
pub struct DebugServerTool {
    store: Arc<ProjectStore>,
}

impl DebugServerTool {
    /// Create the tool over a shared store
    pub fn new(store: Arc<ProjectStore>) -> Self {
        Self { store }
    }
}

fn write_contents(text: &mut String, label: &str, report: &DirectoryReport) {
    match &report.contents {
        Ok(names) => {
            let _ = writeln!(text, "- {}: {} items", label, names.len());
            if !names.is_empty() {
                let _ = writeln!(text, "  {}", names.join(", "));
            }
        }
        Err(e) => {
            let _ = writeln!(text, "- {} Read Error: {}", label, e);
        }
    }
}

#[async_trait]
impl Tool for DebugServerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "debug-server".to_string(),
            description: "Get debugging information about the server environment".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "checkDirectories": {
                        "type": "boolean",
                        "description": "Check if directories exist and are accessible",
                        "default": true
                    }
                }
            }),
        }
    }

    async fn call(&self, args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: DebugParams = serde_json::from_value(args)?;
        let cwd = std::env::current_dir()?;

        let mut text = String::from("=== Spine MCP Server Debug Information ===\n\n");
        let _ = writeln!(text, "Server Version: {}", env!("CARGO_PKG_VERSION"));
        let _ = writeln!(text, "Platform: {}", std::env::consts::OS);
        let _ = writeln!(text, "Architecture: {}", std::env::consts::ARCH);
        let _ = writeln!(text, "Current Working Directory: {}\n", cwd.display());

        let _ = writeln!(text, "Server Directories:");
        let _ = writeln!(text, "- User Projects: {}", self.store.user_dir().display());
        let _ = writeln!(text, "- Examples: {}\n", self.store.examples_dir().display());

        if params.check_directories {
            let (user, examples) = self.store.directory_reports().await;

            let _ = writeln!(text, "Directory Status:");
            let _ = writeln!(text, "- User Projects Directory Exists: {}", user.existed);
            if !user.existed {
                let _ = writeln!(
                    text,
                    "- User Projects Directory Created: {}",
                    user.contents.is_ok()
                );
            }
            let _ = writeln!(text, "- Examples Directory Exists: {}\n", examples.existed);

            let _ = writeln!(text, "Directory Contents:");
            write_contents(&mut text, "User Projects", &user);
            write_contents(&mut text, "Examples", &examples);

            let _ = writeln!(text, "\nSpine Executable:");
            match self.store.find_editor().await {
                Some(path) => {
                    let _ = writeln!(text, "- Found: true");
                    let _ = writeln!(text, "- Path: {}", path.display());
                }
                None => {
                    let checked: Vec<String> = self
                        .store
                        .editor_paths()
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect();
                    let _ = writeln!(text, "- Found: false");
                    let _ = writeln!(text, "- Checked Paths:\n  {}", checked.join("\n  "));
                }
            }
        }

        Ok(ToolResult::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_default_includes_examples() {
        let params: ListProjectsParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.include_examples);

        let params: ListProjectsParams =
            serde_json::from_value(json!({"includeExamples": false})).unwrap();
        assert!(!params.include_examples);
    }

    #[test]
    fn test_export_params_deserialize() {
        let params: ExportParams = serde_json::from_value(json!({
            "projectName": "hero",
            "format": "atlas",
            "outputName": "hero-atlas"
        }))
        .unwrap();
        assert_eq!(params.project_name, "hero");
        assert_eq!(params.format.as_deref(), Some("atlas"));
        assert_eq!(params.output_name.as_deref(), Some("hero-atlas"));
    }

    #[test]
    fn test_generate_params_description_optional() {
        let params: GenerateParams = serde_json::from_value(json!({"name": "hero"})).unwrap();
        assert_eq!(params.name, "hero");
        assert!(params.description.is_none());
    }
}
