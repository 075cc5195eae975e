pub mod config;

pub use config::{BrowserType, CliOverrides, Config, Expectations};
