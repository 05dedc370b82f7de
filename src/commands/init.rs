use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and:
/// - Creates an initial `config.json` file using `seed_url` along with default settings
/// - Creates the SQLite database with an empty transactions table
///
/// # Arguments
/// - `home` - The directory that will hold the configuration and data, e.g. `$HOME/product-sales`
/// - `seed_url` - The URL of the JSON feed the records are loaded from. The public sample feed is
///   used when this is `None`.
///
/// # Errors
/// - Returns an error if the directory was already initialized or any file operation fails.
pub async fn init(home: &Path, seed_url: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(home, seed_url)
        .await
        .context("Unable to create the home directory and configs")
        .pub_result(ErrorType::Config)?;
    let message = format!(
        "Successfully created {}, run 'product-sales seed' to load the records",
        config.root().display()
    );
    config.db().close().await;
    Ok(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("ps");
        let out = init(&home, None).await.unwrap();
        assert!(out.message().starts_with("Successfully created"));

        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.seed_url(), crate::config::DEFAULT_SEED_URL);
    }

    #[tokio::test]
    async fn test_init_twice_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        init(dir.path(), None).await.unwrap();
        let e = init(dir.path(), None).await.unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Config);
    }
}
