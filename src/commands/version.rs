use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;
use crate::VERSION;

#[derive(Debug, PartialEq)]
pub struct Version;

impl Executable for Version {
    async fn exec<B: Backend>(self, _ctx: &Context<B>) -> Result<Reply, BackendError> {
        Ok(Reply::new(format!("v{}", VERSION)))
    }
}

impl TryFrom<&mut CommandParser> for Version {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
