pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::smtp::SmtpNotifier;
pub use crate::config::{cli::LocalStorage, toml_config::MailConfig, CliConfig};
pub use crate::core::santa::{RunReport, SecretSanta};
pub use crate::utils::error::{Result, SantaError};
