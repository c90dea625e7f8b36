//! Application services - Use case implementations

mod bot_service;
pub mod renderer;
mod stop_locator;

pub use bot_service::{BotService, BotSettings};
pub use renderer::{DisplayText, RenderMode};
pub use stop_locator::{CatalogError, StopCatalog};
