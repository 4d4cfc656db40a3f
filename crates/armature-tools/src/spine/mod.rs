//! Spine animation project tools

mod store;
mod template;
mod tools;

pub use store::{find_editor, sanitize_name, DirectoryReport, ExportFormat, Project, ProjectStore};
pub use tools::{
    DebugServerTool, ExportAnimationTool, GenerateAnimationTool, ListProjectsTool,
    ProjectDetailsTool,
};
