//! # Armature Tools
//!
//! The tool sets served by Armature:
//!
//! - **spine**: list, describe, export and generate Spine animation projects
//! - **games**: read and write game data files, list game directories
//!
//! Each set is built into a [`ToolRegistry`] ready for the dispatcher:
//!
//! ```no_run
//! # async fn demo() -> Result<(), armature_tools::SetupError> {
//! use armature_tools::{build_registry, ToolsConfig};
//!
//! let registry = build_registry(&ToolsConfig::default()).await?;
//! assert_eq!(registry.len(), 5);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod fs_ext;
pub mod games;
pub mod spine;

pub use config::{GamesConfig, SpineConfig, ToolSet, ToolsConfig};
pub use error::SetupError;

use armature_dispatch::ToolRegistry;
use std::sync::Arc;
use tracing::info;

/// Build the Spine tool set
pub async fn spine_registry(config: &SpineConfig) -> Result<ToolRegistry, SetupError> {
    let store = Arc::new(spine::ProjectStore::open(config).await?);

    let mut registry = ToolRegistry::new();
    registry.register(spine::ListProjectsTool::new(store.clone()))?;
    registry.register(spine::ProjectDetailsTool::new(store.clone()))?;
    registry.register(spine::ExportAnimationTool::new(store.clone()))?;
    registry.register(spine::GenerateAnimationTool::new(store.clone()))?;
    registry.register(spine::DebugServerTool::new(store))?;
    Ok(registry)
}

/// Build the game data tool set
pub async fn games_registry(config: &GamesConfig) -> Result<ToolRegistry, SetupError> {
    let library = Arc::new(games::GameLibrary::open(config).await?);

    let mut registry = ToolRegistry::new();
    registry.register(games::ListDirectoriesTool::new(library.clone()))?;
    registry.register(games::ReadGameFileTool::new(library.clone()))?;
    registry.register(games::SaveGameDataTool::new(library.clone()))?;
    registry.register(games::ListGamesTool::new(library.clone()))?;
    registry.register(games::GameDetailsTool::new(library))?;
    Ok(registry)
}

/// Build the tool set selected by `config.set`
pub async fn build_registry(config: &ToolsConfig) -> Result<ToolRegistry, SetupError> {
    let registry = match config.set {
        ToolSet::Spine => spine_registry(&config.spine).await?,
        ToolSet::Games => games_registry(&config.games).await?,
    };
    info!("Loaded {} tool set: {:?}", config.set, registry.names());
    Ok(registry)
}
