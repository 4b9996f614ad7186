use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandName, CommandParser, CommandParserError};
use crate::reply::{escape, Reply};
use crate::server::Context;

/// Sentinel returned for keys that do not exist.
pub const NIL: &str = "(nil)";

/// Get the value of `key`. If the key does not exist the special value `(nil)` is returned.
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Executable for Get {
    async fn exec<B: Backend>(self, ctx: &Context<B>) -> Result<Reply, BackendError> {
        let value = ctx.backend.get(&self.key).await?;

        match value {
            Some(value) => Ok(Reply::new(escape(&value))),
            None => Ok(Reply::new(NIL)),
        }
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let [key] = parser
            .exactly::<1>()
            .ok_or(CommandParserError::MissingArguments {
                command: CommandName::Get,
                requirement: "a key",
            })?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{dispatch, testing, Command};

    #[tokio::test]
    async fn existing_key() {
        let cmd = Command::try_from(CommandParser::parse("GET key1")).unwrap();
        assert_eq!(
            cmd,
            Command::Get(Get {
                key: String::from("key1")
            })
        );

        let ctx = testing::context();
        testing::seed(&ctx, &[("key1", "1")]).await;

        let result = cmd.exec(&ctx).await.unwrap();

        assert_eq!(result, Reply::new("1"));
    }

    #[tokio::test]
    async fn missing_key() {
        let cmd = Command::try_from(CommandParser::parse("get key1")).unwrap();
        let ctx = testing::context();

        let result = cmd.exec(&ctx).await.unwrap();

        assert_eq!(result, Reply::new("(nil)"));
    }

    #[tokio::test]
    async fn multi_line_values_are_escaped() {
        let ctx = testing::context();
        testing::seed(&ctx, &[("key1", "line one\nline two")]).await;

        let cmd = Command::try_from(CommandParser::parse("get key1")).unwrap();
        let result = cmd.exec(&ctx).await.unwrap();

        assert_eq!(result, Reply::new("line one\\nline two"));
    }

    #[tokio::test]
    async fn backslashes_round_trip() {
        let ctx = testing::context();

        assert_eq!(dispatch(r"set path C:\tmp\x", &ctx).await, Reply::ok());
        assert_eq!(dispatch("get path", &ctx).await, Reply::new(r"C:\tmp\x"));
    }

    #[test]
    fn wrong_number_of_arguments() {
        for line in ["get", "get a b", "get  key"] {
            let err = Command::try_from(CommandParser::parse(line)).unwrap_err();
            assert_eq!(err.to_string(), "ERROR: \"get\" command requires a key.");
        }
    }

    #[tokio::test]
    async fn wrong_arity_never_reaches_the_backend() {
        let ctx = testing::context();
        testing::seed(&ctx, &[("a", "1")]).await;

        for line in ["get", "get a b"] {
            assert_eq!(
                dispatch(line, &ctx).await,
                Reply::new("ERROR: \"get\" command requires a key.")
            );
        }
        assert_eq!(ctx.backend.calls(), 0);
    }
}
