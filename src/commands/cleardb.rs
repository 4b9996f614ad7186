use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Delete every key. There is no undo.
#[derive(Debug, PartialEq)]
pub struct ClearDb;

impl Executable for ClearDb {
    async fn exec<B: Backend>(self, ctx: &Context<B>) -> Result<Reply, BackendError> {
        ctx.backend.clear().await?;
        Ok(Reply::ok())
    }
}

impl TryFrom<&mut CommandParser> for ClearDb {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
