//! Tool set configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which tool set the server exposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolSet {
    /// Spine animation project tools
    #[default]
    Spine,
    /// Game data file tools
    Games,
}

impl fmt::Display for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolSet::Spine => write!(f, "spine"),
            ToolSet::Games => write!(f, "games"),
        }
    }
}

impl FromStr for ToolSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spine" => Ok(ToolSet::Spine),
            "games" => Ok(ToolSet::Games),
            other => Err(format!("unknown tool set '{}' (expected spine or games)", other)),
        }
    }
}

/// `[tools]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Selected tool set
    /// Default: spine
    #[serde(default)]
    pub set: ToolSet,

    /// Spine tool settings
    #[serde(default)]
    pub spine: SpineConfig,

    /// Game data tool settings
    #[serde(default)]
    pub games: GamesConfig,
}

/// `[tools.spine]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineConfig {
    /// Directory holding user projects; exports and generated files land here
    /// Default: user-projects
    #[serde(default = "default_user_projects_dir")]
    pub user_projects_dir: PathBuf,

    /// Directory holding example projects
    /// Default: examples
    #[serde(default = "default_examples_dir")]
    pub examples_dir: PathBuf,

    /// Candidate locations of the Spine editor executable, checked in order
    #[serde(default = "default_editor_paths")]
    pub editor_paths: Vec<PathBuf>,
}

fn default_user_projects_dir() -> PathBuf {
    PathBuf::from("user-projects")
}

fn default_examples_dir() -> PathBuf {
    PathBuf::from("examples")
}

fn default_editor_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Cursor\Spine\Spine.exe"),
        PathBuf::from("../Spine.exe"),
        PathBuf::from("Spine.exe"),
        PathBuf::from(r"C:\Program Files\Spine\Spine.exe"),
        PathBuf::from(r"C:\Spine\Spine.exe"),
    ]
}

impl Default for SpineConfig {
    fn default() -> Self {
        Self {
            user_projects_dir: default_user_projects_dir(),
            examples_dir: default_examples_dir(),
            editor_paths: default_editor_paths(),
        }
    }
}

/// `[tools.games]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamesConfig {
    /// Root holding one directory per game plus the data directories
    /// Default: Games
    #[serde(default = "default_games_root")]
    pub root_dir: PathBuf,
}

fn default_games_root() -> PathBuf {
    PathBuf::from("Games")
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            root_dir: default_games_root(),
        }
    }
}
