mod renderer;
mod state;
pub mod theme;

pub use renderer::render;
pub use state::UiState;
pub use theme::Theme;
