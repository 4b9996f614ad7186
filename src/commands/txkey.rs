use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::keygen;
use crate::reply::Reply;
use crate::server::Context;

/// Replies with a fresh time ordered key.
#[derive(Debug, PartialEq)]
pub struct TxKey;

impl Executable for TxKey {
    async fn exec<B: Backend>(self, _ctx: &Context<B>) -> Result<Reply, BackendError> {
        Ok(Reply::new(keygen::txkey()))
    }
}

impl TryFrom<&mut CommandParser> for TxKey {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
