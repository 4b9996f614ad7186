use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandName, CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Set `key` to hold `value`. The value is everything after the key, so it may contain spaces.
/// Replies `OK`, or `fail` when the backend does not acknowledge the write.
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: String,
}

impl Executable for Set {
    async fn exec<B: Backend>(self, ctx: &Context<B>) -> Result<Reply, BackendError> {
        let stored = ctx.backend.set(&self.key, &self.value).await?;
        Ok(Reply::new(if stored { "OK" } else { "fail" }))
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let (key, value) = parser
            .key_and_rest()
            .ok_or(CommandParserError::MissingArguments {
                command: CommandName::Set,
                requirement: "a key and a value",
            })?;

        Ok(Self { key, value })
    }
}
