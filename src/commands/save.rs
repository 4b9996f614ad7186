use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Acknowledges a save request. Backends persist on their own, so there is nothing to do.
#[derive(Debug, PartialEq)]
pub struct Save;

impl Executable for Save {
    async fn exec<B: Backend>(self, _ctx: &Context<B>) -> Result<Reply, BackendError> {
        Ok(Reply::ok())
    }
}

impl TryFrom<&mut CommandParser> for Save {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
