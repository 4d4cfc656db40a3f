//! Spine project store
//!
//! Projects are `*.json` or `*.spine` files in the user and example
//! directories; a project's name is its file stem.

use crate::config::SpineConfig;
use crate::error::SetupError;
use crate::fs_ext::{exists, is_dir, is_file};
use crate::spine::template;
use armature_dispatch::ToolError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, warn};

const PROJECT_EXTENSIONS: [&str; 2] = ["json", "spine"];

/// A project file on disk
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// File stem
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Found in the examples directory
    pub is_example: bool,
}

/// Output format of `export-spine-animation`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Source JSON with an `exported` stamp
    Json,
    /// Placeholder texture atlas
    Atlas,
    /// Byte copy of the source
    Binary,
}

impl ExportFormat {
    /// Parse a format name; schema validation has already limited the values
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "json" => Some(ExportFormat::Json),
            "atlas" => Some(ExportFormat::Atlas),
            "binary" => Some(ExportFormat::Binary),
            _ => None,
        }
    }

    /// File extension and wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Atlas => "atlas",
            ExportFormat::Binary => "binary",
        }
    }
}

/// Directory listing used by `debug-server`
#[derive(Debug, Clone)]
pub struct DirectoryReport {
    /// Directory path
    pub path: PathBuf,
    /// Existed before the check
    pub existed: bool,
    /// Entry names, or the read error
    pub contents: Result<Vec<String>, String>,
}

/// Project store over the user and examples directories
#[derive(Debug, Clone)]
pub struct ProjectStore {
    user_dir: PathBuf,
    examples_dir: PathBuf,
    editor_paths: Vec<PathBuf>,
}

impl ProjectStore {
    /// Open the store, creating missing directories
    ///
    /// A newly created examples directory is seeded with
    /// `example-project.json`.
    pub async fn open(config: &SpineConfig) -> Result<Self, SetupError> {
        let store = Self {
            user_dir: config.user_projects_dir.clone(),
            examples_dir: config.examples_dir.clone(),
            editor_paths: config.editor_paths.clone(),
        };
        store.ensure_directories().await?;
        info!(
            "Spine project store: user {}, examples {}",
            store.user_dir.display(),
            store.examples_dir.display()
        );
        Ok(store)
    }

    async fn ensure_directories(&self) -> Result<(), SetupError> {
        if !exists(&self.user_dir).await {
            debug!("Creating user projects directory: {}", self.user_dir.display());
            fs::create_dir_all(&self.user_dir)
                .await
                .map_err(|e| SetupError::directory(&self.user_dir, e))?;
        }

        if !exists(&self.examples_dir).await {
            debug!("Creating examples directory: {}", self.examples_dir.display());
            fs::create_dir_all(&self.examples_dir)
                .await
                .map_err(|e| SetupError::directory(&self.examples_dir, e))?;

            let path = self.examples_dir.join("example-project.json");
            let body = serde_json::to_string_pretty(&template::example_project())
                .unwrap_or_else(|_| "{}".to_string());
            if let Err(e) = fs::write(&path, body).await {
                warn!("Error creating example project: {}", e);
            }
        }
        Ok(())
    }

    /// User projects directory
    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    /// Examples directory
    pub fn examples_dir(&self) -> &Path {
        &self.examples_dir
    }

    /// Candidate editor locations
    pub fn editor_paths(&self) -> &[PathBuf] {
        &self.editor_paths
    }

    /// All projects, user projects first
    pub async fn projects(&self) -> std::io::Result<Vec<Project>> {
        let mut projects = scan(&self.user_dir, false).await?;
        projects.extend(scan(&self.examples_dir, true).await?);
        debug!("Total projects found: {}", projects.len());
        Ok(projects)
    }

    /// Find a project by name
    pub async fn find(&self, name: &str) -> std::io::Result<Option<Project>> {
        Ok(self.projects().await?.into_iter().find(|p| p.name == name))
    }

    /// Human-readable project summary, `None` if no such project
    pub async fn details(&self, name: &str) -> std::io::Result<Option<String>> {
        let Some(project) = self.find(name).await? else {
            debug!("Project not found: {}", name);
            return Ok(None);
        };

        let mut text = String::new();
        let _ = writeln!(text, "Project: {}", project.name);
        let _ = writeln!(text, "Path: {}", project.path.display());
        let _ = writeln!(text, "Size: {:.2} KB", project.size as f64 / 1024.0);
        let _ = writeln!(text, "Last Modified: {}", project.modified.to_rfc3339());
        let _ = writeln!(
            text,
            "Type: {} Project",
            if project.is_example { "Example" } else { "User" }
        );

        if has_extension(&project.path, "spine") {
            return Ok(Some(text));
        }

        let raw = fs::read_to_string(&project.path).await?;
        let data: Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                warn!("Error parsing project file {}: {}", project.path.display(), e);
                return Ok(Some(format!(
                    "Project file exists but could not be parsed: {}\nError: {}",
                    project.path.display(),
                    e
                )));
            }
        };
        describe_skeleton(&mut text, &data);
        Ok(Some(text))
    }

    /// Export a project into the user directory as `<output_name>.<format>`
    pub async fn export(
        &self,
        project: &Project,
        format: ExportFormat,
        output_name: &str,
    ) -> Result<PathBuf, ToolError> {
        let target = self.export_path(output_name, format);
        match format {
            ExportFormat::Json => {
                let raw = fs::read_to_string(&project.path).await?;
                let mut data: Value = serde_json::from_str(&raw)?;
                let Some(object) = data.as_object_mut() else {
                    return Err(ToolError::Invalid(format!(
                        "Project {} is not a JSON object",
                        project.name
                    )));
                };
                object.insert(
                    "exported".to_string(),
                    serde_json::json!({
                        "date": Utc::now().to_rfc3339(),
                        "format": format.as_str(),
                        "source": project.name,
                    }),
                );
                fs::write(&target, serde_json::to_string_pretty(&data)?).await?;
            }
            ExportFormat::Atlas => {
                fs::write(&target, template::atlas(output_name)).await?;
            }
            ExportFormat::Binary => {
                fs::copy(&project.path, &target).await?;
            }
        }
        info!("Exported {} to {}", project.name, target.display());
        Ok(target)
    }

    /// Where an export with this output name is written
    pub fn export_path(&self, output_name: &str, format: ExportFormat) -> PathBuf {
        self.user_dir
            .join(format!("{}.{}", output_name, format.as_str()))
    }

    /// Pick the file for a newly generated animation
    ///
    /// `<safe>.json`, or `<safe>_<millis>.json` when that is taken.
    pub async fn generated_path(&self, name: &str, now: DateTime<Utc>) -> PathBuf {
        let safe = sanitize_name(name);
        let path = self.user_dir.join(format!("{}.json", safe));
        if exists(&path).await {
            let alt = self
                .user_dir
                .join(format!("{}_{}.json", safe, now.timestamp_millis()));
            debug!("File already exists, using new path: {}", alt.display());
            alt
        } else {
            path
        }
    }

    /// Write a humanoid template to `path`
    pub async fn write_generated(
        &self,
        path: &Path,
        name: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ToolError> {
        fs::create_dir_all(&self.user_dir).await?;
        let skeleton = template::humanoid(name, description, now);
        fs::write(path, serde_json::to_string_pretty(&skeleton)?).await?;
        info!("Generated animation at {}", path.display());
        Ok(())
    }

    /// First candidate editor path that exists
    pub async fn find_editor(&self) -> Option<PathBuf> {
        find_editor(&self.editor_paths).await
    }

    /// Launch the editor on `file`; `false` if it could not start
    ///
    /// The child is not waited on here. Tokio reaps it in the background
    /// once it exits.
    pub async fn open_in_editor(&self, file: &Path) -> bool {
        let Some(editor) = self.find_editor().await else {
            return false;
        };

        match Command::new(&editor)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                info!("Spine process started with PID: {:?}", child.id());
                true
            }
            Err(e) => {
                warn!("Error opening file in Spine: {}", e);
                false
            }
        }
    }

    /// Snapshot of both directories, creating the user directory if missing
    pub async fn directory_reports(&self) -> (DirectoryReport, DirectoryReport) {
        let user_existed = exists(&self.user_dir).await;
        if !user_existed {
            if let Err(e) = fs::create_dir_all(&self.user_dir).await {
                warn!("Failed to create {}: {}", self.user_dir.display(), e);
            }
        }
        let user = DirectoryReport {
            path: self.user_dir.clone(),
            existed: user_existed,
            contents: list_names(&self.user_dir).await,
        };
        let examples = DirectoryReport {
            path: self.examples_dir.clone(),
            existed: exists(&self.examples_dir).await,
            contents: list_names(&self.examples_dir).await,
        };
        (user, examples)
    }
}

/// First path in `candidates` that is an existing file
pub async fn find_editor(candidates: &[PathBuf]) -> Option<PathBuf> {
    for path in candidates {
        if is_file(path).await {
            debug!("Spine executable found at: {}", path.display());
            return Some(path.clone());
        }
    }
    debug!("Spine executable not found in any of the expected locations");
    None
}

/// Replace everything outside `[A-Za-z0-9_-]` with `_`
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

async fn scan(dir: &Path, is_example: bool) -> std::io::Result<Vec<Project>> {
    let mut projects = Vec::new();
    if !is_dir(dir).await {
        debug!("Project directory does not exist: {}", dir.display());
        return Ok(projects);
    }

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_project = PROJECT_EXTENSIONS.iter().any(|ext| has_extension(&path, ext));
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !is_project {
            continue;
        }
        let meta = entry.metadata().await?;
        if !meta.is_file() {
            continue;
        }
        projects.push(Project {
            name: stem.to_string(),
            path: path.clone(),
            size: meta.len(),
            modified: meta.modified().map(DateTime::<Utc>::from).unwrap_or_default(),
            is_example,
        });
    }

    projects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(projects)
}

async fn list_names(dir: &Path) -> Result<Vec<String>, String> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await.map_err(|e| e.to_string())?;
    while let Some(entry) = entries.next_entry().await.map_err(|e| e.to_string())? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn describe_skeleton(text: &mut String, data: &Value) {
    if let Some(skeleton) = data.get("skeleton") {
        let field = |key: &str| match skeleton.get(key) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => "Unknown".to_string(),
        };
        let _ = writeln!(text, "\nSkeleton Information:");
        let _ = writeln!(text, "- Spine Version: {}", field("spine"));
        let _ = writeln!(text, "- Width: {}", field("width"));
        let _ = writeln!(text, "- Height: {}", field("height"));
    }

    if let Some(bones) = data.get("bones").and_then(Value::as_array) {
        let _ = writeln!(text, "\nBones: {}", bones.len());
        let roots: Vec<&str> = bones
            .iter()
            .filter(|b| b.get("parent").is_none())
            .filter_map(|b| b.get("name").and_then(Value::as_str))
            .collect();
        if !roots.is_empty() {
            let _ = writeln!(text, "- Root Bones: {}", roots.join(", "));
        }
    }

    if let Some(animations) = data.get("animations").and_then(Value::as_object) {
        let _ = writeln!(text, "\nAnimations: {}", animations.len());
        if !animations.is_empty() {
            let names: Vec<&str> = animations.keys().map(String::as_str).collect();
            let _ = writeln!(text, "- Names: {}", names.join(", "));
        }
    }

    if let Some(skins) = data.get("skins").and_then(Value::as_array) {
        let _ = writeln!(text, "\nSkins: {}", skins.len());
        let names: Vec<&str> = skins
            .iter()
            .filter_map(|s| s.get("name").and_then(Value::as_str))
            .collect();
        if !names.is_empty() {
            let _ = writeln!(text, "- Names: {}", names.join(", "));
        }
    }
}
