mod app_config;
mod parsing_session;

pub use app_config::{AppConfig, AppConfigExt, config_file_path, default_log_path};
pub use parsing_session::ParsingSession;
