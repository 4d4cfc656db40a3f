//! Game data tools
//!
//! Everything lives under one root: a directory per game, plus the
//! `configs/`, `game_data/` and `analysis/` data directories.

use crate::config::GamesConfig;
use crate::error::{single_component, SetupError};
use crate::fs_ext::{is_dir, is_file};
use armature_dispatch::{Tool, ToolContext, ToolError};
use armature_protocol::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// One of the three data directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataDir {
    /// `configs/`
    Configs,
    /// `game_data/`
    GameData,
    /// `analysis/`
    Analysis,
}

impl DataDir {
    const ALL: [DataDir; 3] = [DataDir::Configs, DataDir::GameData, DataDir::Analysis];

    /// Directory name under the root
    pub fn dir_name(&self) -> &'static str {
        match self {
            DataDir::Configs => "configs",
            DataDir::GameData => "game_data",
            DataDir::Analysis => "analysis",
        }
    }
}

fn directory_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description,
        "enum": ["configs", "game_data", "analysis"]
    })
}

/// Root of the game library
#[derive(Debug, Clone)]
pub struct GameLibrary {
    root: PathBuf,
}

impl GameLibrary {
    /// Open the library, creating the data directories
    pub async fn open(config: &GamesConfig) -> Result<Self, SetupError> {
        let library = Self {
            root: config.root_dir.clone(),
        };
        for dir in DataDir::ALL {
            let path = library.data_dir(dir);
            fs::create_dir_all(&path)
                .await
                .map_err(|e| SetupError::directory(&path, e))?;
        }
        info!("Game library at {}", library.root.display());
        Ok(library)
    }

    /// Library root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a data directory
    pub fn data_dir(&self, dir: DataDir) -> PathBuf {
        self.root.join(dir.dir_name())
    }

    /// File inside a data directory; `filename` must be a single component
    pub fn data_file(&self, dir: DataDir, filename: &str) -> Result<PathBuf, ToolError> {
        single_component("filename", filename)?;
        Ok(self.data_dir(dir).join(filename))
    }

    /// Entry names of a data directory, empty if it is missing
    pub async fn list(&self, dir: DataDir) -> Result<Vec<String>, ToolError> {
        let path = self.data_dir(dir);
        if !is_dir(&path).await {
            return Ok(Vec::new());
        }
        entry_names(&path, |_| true).await
    }

    /// Game directories under the root, excluding the data directories
    pub async fn games(&self) -> Result<Vec<String>, ToolError> {
        let names = entry_names(&self.root, |meta| meta.is_dir()).await?;
        Ok(names
            .into_iter()
            .filter(|n| !DataDir::ALL.iter().any(|d| d.dir_name() == n.as_str()))
            .collect())
    }
}

async fn entry_names(
    dir: &Path,
    keep: impl Fn(&std::fs::Metadata) -> bool,
) -> Result<Vec<String>, ToolError> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if keep(&entry.metadata().await?) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Lists the data directories
pub struct ListDirectoriesTool {
    library: Arc<GameLibrary>,
}

impl ListDirectoriesTool {
    /// Create the tool over a shared library
    pub fn new(library: Arc<GameLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for ListDirectoriesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "list_directories".to_string(),
            description: "Get the directory structure holding game data".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        }
    }

    async fn call(&self, _args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let listing = json!({
            "root": self.library.root().display().to_string(),
            "directories": {
                "config": self.library.list(DataDir::Configs).await?,
                "data": self.library.list(DataDir::GameData).await?,
                "analysis": self.library.list(DataDir::Analysis).await?,
            }
        });
        Ok(ToolResult::text(serde_json::to_string_pretty(&listing)?))
    }
}

/// Parameters for `read_game_file`
#[derive(Debug, Deserialize)]
pub struct ReadFileParams {
    /// Data directory
    pub directory: DataDir,
    /// File name inside it
    pub filename: String,
}

/// Reads a file from a data directory
pub struct ReadGameFileTool {
    library: Arc<GameLibrary>,
}

impl ReadGameFileTool {
    /// Create the tool over a shared library
    pub fn new(library: Arc<GameLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for ReadGameFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "read_game_file".to_string(),
            description: "Read a game data file".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "directory": directory_schema("Directory (configs, game_data, analysis)"),
                    "filename": {"type": "string", "description": "File name"}
                },
                "required": ["directory", "filename"]
            }),
        }
    }

    async fn call(&self, args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: ReadFileParams = serde_json::from_value(args)?;
        let path = self.library.data_file(params.directory, &params.filename)?;
        if !is_file(&path).await {
            return Err(ToolError::NotFound("File not found".to_string()));
        }

        let raw = fs::read_to_string(&path).await?;
        let result = match serde_json::from_str::<Value>(&raw) {
            Ok(parsed) => {
                ToolResult::text(serde_json::to_string_pretty(&parsed)?).with_extra("format", "json")
            }
            Err(_) => ToolResult::text(raw).with_extra("format", "text"),
        };
        debug!("Read {}", path.display());
        Ok(result)
    }
}

/// Parameters for `save_game_data`
#[derive(Debug, Deserialize)]
pub struct SaveParams {
    /// Data directory
    pub directory: DataDir,
    /// File name inside it
    pub filename: String,
    /// JSON document to store
    pub content: Value,
}

/// Writes a JSON document into a data directory
pub struct SaveGameDataTool {
    library: Arc<GameLibrary>,
}

impl SaveGameDataTool {
    /// Create the tool over a shared library
    pub fn new(library: Arc<GameLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for SaveGameDataTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "save_game_data".to_string(),
            description: "Save new game data".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "directory": directory_schema("Target directory (configs, game_data, analysis)"),
                    "filename": {"type": "string", "description": "File name"},
                    "content": {
                        "type": "object",
                        "description": "File content, stored as JSON"
                    }
                },
                "required": ["directory", "filename", "content"]
            }),
        }
    }

    async fn call(&self, args: Value, ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: SaveParams = serde_json::from_value(args)?;
        let path = self.library.data_file(params.directory, &params.filename)?;

        let mut content = params.content;
        if let Some(object) = content.as_object_mut() {
            object.insert(
                "_metadata".to_string(),
                json!({ "saved_at": Utc::now().to_rfc3339() }),
            );
        }

        ctx.commit()?;
        fs::write(&path, serde_json::to_string_pretty(&content)?).await?;
        info!("Saved {}", path.display());

        Ok(ToolResult::text(format!(
            "File saved to {}/{}",
            params.directory.dir_name(),
            params.filename
        )))
    }
}

/// Lists game directories
pub struct ListGamesTool {
    library: Arc<GameLibrary>,
}

impl ListGamesTool {
    /// Create the tool over a shared library
    pub fn new(library: Arc<GameLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for ListGamesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "list-games".to_string(),
            description: "List the available games".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        }
    }

    async fn call(&self, _args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let games = self.library.games().await?;
        Ok(ToolResult::text(format!(
            "Available games: {}",
            games.join(", ")
        )))
    }
}

/// Parameters for `get-game-details`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetailsParams {
    /// Game directory name
    pub game_name: String,
}

/// Describes one game directory
pub struct GameDetailsTool {
    library: Arc<GameLibrary>,
}

impl GameDetailsTool {
    /// Create the tool over a shared library
    pub fn new(library: Arc<GameLibrary>) -> Self {
        Self { library }
    }
}

#[async_trait]
impl Tool for GameDetailsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get-game-details".to_string(),
            description: "Get the files of a game and whether it is playable".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "gameName": {"type": "string", "description": "Game directory name"}
                },
                "required": ["gameName"]
            }),
        }
    }

    async fn call(&self, args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: GameDetailsParams = serde_json::from_value(args)?;
        single_component("game name", &params.game_name)?;

        let dir = self.library.root().join(&params.game_name);
        if !is_dir(&dir).await {
            return Ok(ToolResult::text(format!(
                "Game \"{}\" not found.",
                params.game_name
            )));
        }

        let files = entry_names(&dir, |_| true).await?;
        let playable = files.iter().any(|f| f == "index.html" || f == "game.html");
        Ok(ToolResult::text(format!(
            "Game: {}\nFiles: {}\nPlayable: {}",
            params.game_name,
            files.join(", "),
            if playable { "Yes" } else { "No" }
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_deserialize() {
        let params: ReadFileParams =
            serde_json::from_value(json!({"directory": "game_data", "filename": "a.json"}))
                .unwrap();
        assert_eq!(params.directory, DataDir::GameData);
        assert_eq!(params.directory.dir_name(), "game_data");
    }

    #[test]
    fn test_data_file_rejects_traversal() {
        let library = GameLibrary {
            root: PathBuf::from("Games"),
        };
        assert!(library.data_file(DataDir::Configs, "../x.json").is_err());
        assert_eq!(
            library.data_file(DataDir::Configs, "x.json").unwrap(),
            PathBuf::from("Games").join("configs").join("x.json")
        );
    }
}
