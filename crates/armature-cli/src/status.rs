//! HTTP status route wiring.

use armature_dispatch::Dispatcher;
use armature_http::handlers::{AppState, EditorCheck};
use armature_tools::{spine, SpineConfig, ToolSet, ToolsConfig};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Looks for the Spine editor at the configured candidate paths
pub struct SpineEditor {
    candidates: Vec<PathBuf>,
}

impl SpineEditor {
    /// Check the candidates listed in `config`
    pub fn new(config: &SpineConfig) -> Self {
        Self {
            candidates: config.editor_paths.clone(),
        }
    }
}

#[async_trait]
impl EditorCheck for SpineEditor {
    async fn editor_found(&self) -> bool {
        spine::find_editor(&self.candidates).await.is_some()
    }
}

/// HTTP state for the selected tool set
///
/// Only the Spine tools launch an editor, so only they report one.
pub fn http_state(dispatcher: Dispatcher, tools: &ToolsConfig) -> AppState {
    let state = AppState::new(dispatcher);
    match tools.set {
        ToolSet::Spine => state.with_editor_check(Arc::new(SpineEditor::new(&tools.spine))),
        ToolSet::Games => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armature_dispatch::{DispatchConfig, ToolRegistry};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(ToolRegistry::new(), DispatchConfig::default())
    }

    #[tokio::test]
    async fn test_spine_state_checks_configured_editor() {
        let dir = tempfile::tempdir().unwrap();
        let editor = dir.path().join("Spine");
        std::fs::write(&editor, b"").unwrap();

        let mut tools = ToolsConfig::default();
        tools.spine.editor_paths = vec![dir.path().join("missing"), editor];
        let state = http_state(dispatcher(), &tools);
        let check = state.editor.expect("spine reports an editor");
        assert!(check.editor_found().await);

        tools.spine.editor_paths = vec![dir.path().join("missing")];
        let check = http_state(dispatcher(), &tools).editor.unwrap();
        assert!(!check.editor_found().await);
    }

    #[test]
    fn test_games_state_has_no_editor() {
        let tools = ToolsConfig {
            set: ToolSet::Games,
            ..ToolsConfig::default()
        };
        assert!(http_state(dispatcher(), &tools).editor.is_none());
    }
}
