#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod eraser;
pub mod error;
pub mod event;
pub mod history;
pub mod input;
pub mod notes;
pub mod pages;
pub mod panels;
pub mod renderer;
pub mod session;
pub mod store;
pub mod stroke;
pub mod surface;
pub mod texture_manager;
pub mod tools;

pub use app::StudyInkApp;
pub use config::EngineConfig;
pub use engine::DrawingEngine;
pub use eraser::Eraser;
pub use history::{ClearPolicy, HistoryController, HistoryState};
pub use input::{Decision, DeviceClass, InkInputPolicy, InputArbiter, InputEvent, PointerEvent};
pub use pages::{PageInkSet, PageViewport};
pub use renderer::StrokeRenderer;
pub use store::StrokeStore;
pub use stroke::{InkColor, Stroke, StrokeTool};
pub use surface::{Surface, SurfaceLayout, SurfaceMapping, SurfaceSize};
pub use tools::{Tool, ToolSettings};
