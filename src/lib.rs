pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::ProfileConfig, DeskConfig};

pub use app::DeskViews;
pub use core::{client::RestClient, session::AuthSession, session::SessionStore};
pub use domain::ports::BookingApi;
pub use utils::error::{DeskError, Result};
