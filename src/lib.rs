mod api;
pub mod args;
pub mod commands;
mod config;
mod db;
mod error;
pub mod model;
pub mod report;
pub mod server;
pub mod store;
mod utils;


pub use api::{Feed, Mode};
pub use config::Config;
pub use error::Error;
pub use error::ErrorType;
pub use error::IntoResult;
pub use error::Result;
