use crate::api::Mode;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{server, Config, Result};

/// Serves the reporting API until Ctrl-C is received.
pub async fn serve(config: Config, mode: Mode) -> Result<Out<()>> {
    server::run(config, mode)
        .await
        .pub_result(ErrorType::Service)?;
    Ok("Server stopped".into())
}
