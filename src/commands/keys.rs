use glob_match::glob_match;
use itertools::Itertools;

use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandName, CommandParser, CommandParserError};
use crate::reply::{escape, Reply};
use crate::server::Context;

/// Lists every key, space separated, in scan order. An optional glob pattern filters the
/// listing.
#[derive(Debug, PartialEq)]
pub struct Keys {
    pub pattern: Option<String>,
}

impl Executable for Keys {
    async fn exec<B: Backend>(self, ctx: &Context<B>) -> Result<Reply, BackendError> {
        let keys = ctx.backend.keys().await?;

        let listing = keys
            .iter()
            .filter(|key| match &self.pattern {
                Some(pattern) => glob_match(pattern, key),
                None => true,
            })
            .map(|key| escape(key))
            .join(" ");

        Ok(Reply::new(listing))
    }
}

impl TryFrom<&mut CommandParser> for Keys {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let pattern = parser
            .optional()
            .map_err(|_| CommandParserError::TooManyArguments {
                command: CommandName::Keys,
                limit: "at most one pattern",
            })?;
        Ok(Self { pattern })
    }
}
