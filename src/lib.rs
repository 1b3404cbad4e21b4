#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod raster;
pub mod scene;
pub mod state;
pub mod surface;
pub mod texture_manager;
pub mod tools;

pub use app::PaintApp;
pub use command::{Command, CommandHistory};
pub use config::PaintConfig;
pub use error::{PaintError, PaintResult};
pub use event::{EditorEvent, EventBus, EventHandler, EventQueue};
pub use input::{GestureState, InputEvent, InputSequencer};
pub use scene::{Frame, Scene, SceneRenderer, SceneShape, SoftwareSceneRenderer};
pub use state::{EditorContext, EditorSession, SettingKey, ToolSetting};
pub use surface::{Snapshot, Surface};
pub use tools::{Palette, Tool, ToolKind, ToolSet, ToolType};
