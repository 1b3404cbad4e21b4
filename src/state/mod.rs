pub mod context;
mod session;
pub mod settings;

pub use context::EditorContext;
pub use session::EditorSession;
pub use settings::{SettingKey, ToolSetting};
