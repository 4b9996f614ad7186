use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Return the number of keys, as counted by the backend itself rather than by a scan.
#[derive(Debug, PartialEq)]
pub struct DbSize;

impl Executable for DbSize {
    async fn exec<B: Backend>(self, ctx: &Context<B>) -> Result<Reply, BackendError> {
        let size = ctx.backend.len().await?;
        Ok(Reply::new(size.to_string()))
    }
}

impl TryFrom<&mut CommandParser> for DbSize {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
