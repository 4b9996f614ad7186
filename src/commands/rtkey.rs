use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::keygen;
use crate::reply::Reply;
use crate::server::Context;

/// Replies with a fresh random key.
#[derive(Debug, PartialEq)]
pub struct RtKey;

impl Executable for RtKey {
    async fn exec<B: Backend>(self, _ctx: &Context<B>) -> Result<Reply, BackendError> {
        Ok(Reply::new(keygen::rtkey()))
    }
}

impl TryFrom<&mut CommandParser> for RtKey {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
