use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Acknowledges and asks the server to stop. The connection handler performs the shutdown once
/// the reply has been written.
#[derive(Debug, PartialEq)]
pub struct Shutdown;

impl Executable for Shutdown {
    async fn exec<B: Backend>(self, _ctx: &Context<B>) -> Result<Reply, BackendError> {
        Ok(Reply::shutdown("Shutting down."))
    }
}

impl TryFrom<&mut CommandParser> for Shutdown {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
