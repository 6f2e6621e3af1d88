//! PDF Q&A client library (config, HTTP endpoints, view controller).
//! Used by the `pdf-qa` binary.

pub mod client;
pub mod config;
pub mod controller;
pub mod messages;
pub mod view;

pub use client::{Client, ClientError, DEFAULT_BASE_URL};
pub use config::{default_config_path, ApiSection, Config, ConfigError};
pub use controller::{Action, Controller, Outcome};
pub use view::{Region, TerminalView, Tone, View};
