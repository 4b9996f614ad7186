use tracing::debug;

use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Summarizes server health on one line:
///
/// ```text
/// status: ok, dbsize: 42, uptime: 3600s, backend: file:./data/kv-store.json
/// ```
///
/// Never fails. An unreachable backend is reported in the reply instead.
#[derive(Debug, PartialEq)]
pub struct Status;

impl Executable for Status {
    async fn exec<B: Backend>(self, ctx: &Context<B>) -> Result<Reply, BackendError> {
        let alive = match ctx.backend.ping().await {
            Ok(_) => "ok",
            Err(err) => {
                debug!("Status ping failed: {}", err);
                "unreachable"
            }
        };

        let size = match ctx.backend.len().await {
            Ok(size) => size.to_string(),
            Err(_) => "unknown".to_string(),
        };

        Ok(Reply::new(format!(
            "status: {}, dbsize: {}, uptime: {}s, backend: {}",
            alive,
            size,
            ctx.uptime().as_secs(),
            ctx.backend.describe()
        )))
    }
}

impl TryFrom<&mut CommandParser> for Status {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
