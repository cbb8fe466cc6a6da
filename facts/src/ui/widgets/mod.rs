//! TUI widgets for the facts feed

pub mod fact_card;
pub mod input;
pub mod status_bar;
pub mod tutor;

pub use fact_card::FactCardWidget;
pub use input::InputWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
pub use tutor::TutorWidget;
