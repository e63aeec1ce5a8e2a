//! Static preview rendering

pub mod preview;

pub use preview::{render_preview, save_preview, RenderMode, ViewOptions};
