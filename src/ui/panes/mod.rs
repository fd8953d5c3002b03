//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Program text with instruction highlighting and the program counter
//! - [`input`]: The `>>>` prompt and bytes typed ahead of the program
//! - [`terminal`]: Output written by `.`
//! - [`status`]: Status bar with keybindings and VM state
//!
//! Each pane module exports a `render_*` function that draws from borrowed
//! state and keeps no state of its own apart from scroll offsets owned by
//! the caller.

pub mod input;
pub mod source;
pub mod status;
pub mod terminal;

pub use input::render_input_pane;
pub use source::{render_source_pane, SourceMarkers};
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
