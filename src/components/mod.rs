pub mod app;
pub mod controls_panel;
pub mod settings_modal;
pub mod zoom_view;

pub use app::App;
