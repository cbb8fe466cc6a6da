//! UI module for the facts TUI

pub mod render;
pub mod theme;
pub mod widgets;
