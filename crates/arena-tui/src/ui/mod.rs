pub mod app;
pub mod battle;
pub mod battle_log_modal;
pub mod footer;
pub mod header;
pub mod settings_modal;
