use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandName, CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Removes `key`. Replies `1` if the key existed and `0` otherwise.
#[derive(Debug, PartialEq)]
pub struct Remove {
    pub key: String,
}

impl Executable for Remove {
    async fn exec<B: Backend>(self, ctx: &Context<B>) -> Result<Reply, BackendError> {
        let removed = ctx.backend.delete(&self.key).await?;
        Ok(Reply::new(if removed { "1" } else { "0" }))
    }
}

impl TryFrom<&mut CommandParser> for Remove {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let [key] = parser
            .exactly::<1>()
            .ok_or(CommandParserError::MissingArguments {
                command: CommandName::Remove,
                requirement: "a key",
            })?;
        Ok(Self { key })
    }
}
