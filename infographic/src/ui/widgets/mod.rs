//! TUI widgets for the infographic feed

pub mod card;
pub mod creative;
pub mod feed;
pub mod input;

pub use card::CardWidget;
pub use creative::{CreativeForm, CreativeWidget};
pub use feed::FeedWidget;
pub use input::{InputWidget, LineEditor};
