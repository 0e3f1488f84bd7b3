pub mod catalog;
pub mod engine;

pub use engine::{Author, ChatEngine, ChatMessage};
