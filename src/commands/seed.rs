use crate::api::{self, Mode};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};

/// Replaces the stored transactions with the records of the seed feed. In `Mode::Testing` the
/// canned sample feed is used instead of the configured URL.
pub async fn seed(config: Config, mode: Mode) -> Result<Out<()>> {
    let feed = api::feed(&config, mode).pub_result(ErrorType::Config)?;
    let stored = api::seed(config.db(), feed.as_ref()).await?;
    config.db().close().await;
    Ok(format!("Database initialized with {stored} records").into())
}
