//! HTTP Handlers

mod ai;
mod ebook;
mod generation;
mod page;
mod ping;
mod template;
mod websocket;

pub use ai::*;
pub use ebook::*;
pub use generation::*;
pub use page::*;
pub use ping::*;
pub use template::*;
pub use websocket::*;
