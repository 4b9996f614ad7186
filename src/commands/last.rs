use futures::TryStreamExt;
use itertools::Itertools;
use std::collections::VecDeque;
use std::pin::pin;

use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandName, CommandParser, CommandParserError};
use crate::reply::{escape, Reply};
use crate::server::Context;

/// Walks the whole keyspace and replies with the final `count` entries visited, in visiting
/// order, formatted `key:value` and separated by spaces.
///
/// "Last" refers to scan order, not to write order. Fewer entries than requested is not an error.
#[derive(Debug, PartialEq)]
pub struct Last {
    pub count: usize,
}

impl Executable for Last {
    async fn exec<B: Backend>(self, ctx: &Context<B>) -> Result<Reply, BackendError> {
        if self.count == 0 {
            return Ok(Reply::new(""));
        }

        let mut window = VecDeque::new();
        let mut entries = pin!(ctx.backend.entries());
        while let Some(entry) = entries.try_next().await? {
            if window.len() == self.count {
                window.pop_front();
            }
            window.push_back(entry);
        }

        let listing = window
            .iter()
            .map(|(key, value)| format!("{}:{}", escape(key), escape(value)))
            .join(" ");

        Ok(Reply::new(listing))
    }
}

impl TryFrom<&mut CommandParser> for Last {
    type Error = CommandParserError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let [count] = parser
            .exactly::<1>()
            .ok_or(CommandParserError::MissingArguments {
                command: CommandName::Last,
                requirement: "a count",
            })?;

        let count = count
            .parse::<usize>()
            .map_err(|_| CommandParserError::InvalidArgument {
                command: CommandName::Last,
                requirement: "a non-negative integer count",
            })?;

        Ok(Self { count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{dispatch, testing, Command};

    #[tokio::test]
    async fn last_entries_in_scan_order() {
        let ctx = testing::context();
        testing::seed(&ctx, &[("k1", "v1"), ("k2", "v2"), ("k3", "v3")]).await;

        assert_eq!(dispatch("last 2", &ctx).await, Reply::new("k2:v2 k3:v3"));
        assert_eq!(dispatch("last 1", &ctx).await, Reply::new("k3:v3"));
    }

    #[tokio::test]
    async fn count_larger_than_store() {
        let ctx = testing::context();
        testing::seed(&ctx, &[("k1", "v1"), ("k2", "v2"), ("k3", "v3")]).await;

        assert_eq!(
            dispatch("last 10", &ctx).await,
            Reply::new("k1:v1 k2:v2 k3:v3")
        );
    }

    #[tokio::test]
    async fn huge_count_returns_everything() {
        let ctx = testing::context();
        testing::seed(&ctx, &[("k1", "v1"), ("k2", "v2")]).await;

        for line in ["last 100000000000000", "last 18446744073709551615"] {
            assert_eq!(dispatch(line, &ctx).await, Reply::new("k1:v1 k2:v2"));
        }
    }

    #[tokio::test]
    async fn values_with_spaces() {
        let ctx = testing::context();
        testing::seed(&ctx, &[("city", "Buenos Aires")]).await;

        assert_eq!(
            dispatch("last 1", &ctx).await,
            Reply::new("city:Buenos Aires")
        );
    }

    #[tokio::test]
    async fn zero_skips_the_scan() {
        let ctx = testing::context();
        testing::seed(&ctx, &[("k1", "v1")]).await;

        assert_eq!(dispatch("last 0", &ctx).await, Reply::new(""));
        assert_eq!(ctx.backend.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_count_performs_no_scan() {
        let ctx = testing::context();
        testing::seed(&ctx, &[("k1", "v1")]).await;

        for line in ["last abc", "last -1", "last 1.5"] {
            assert_eq!(
                dispatch(line, &ctx).await,
                Reply::new("ERROR: \"last\" command requires a non-negative integer count.")
            );
        }
        assert_eq!(ctx.backend.calls(), 0);
    }

    #[test]
    fn missing_count() {
        let err = Command::try_from(CommandParser::parse("last")).unwrap_err();

        assert_eq!(err.to_string(), "ERROR: \"last\" command requires a count.");
    }
}
