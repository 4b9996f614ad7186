use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Replies `BYE` and closes the issuing connection.
#[derive(Debug, PartialEq)]
pub struct Quit;

impl Executable for Quit {
    async fn exec<B: Backend>(self, _ctx: &Context<B>) -> Result<Reply, BackendError> {
        Ok(Reply::close("BYE"))
    }
}

impl TryFrom<&mut CommandParser> for Quit {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
