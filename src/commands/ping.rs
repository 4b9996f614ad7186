use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Replies `pong`. Only the server is checked, the backend is not contacted.
#[derive(Debug, PartialEq)]
pub struct Ping;

impl Executable for Ping {
    async fn exec<B: Backend>(self, _ctx: &Context<B>) -> Result<Reply, BackendError> {
        Ok(Reply::new("pong"))
    }
}

impl TryFrom<&mut CommandParser> for Ping {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{dispatch, testing};

    #[tokio::test]
    async fn pong_without_touching_the_backend() {
        let ctx = testing::failing_context();

        assert_eq!(dispatch("ping", &ctx).await, Reply::new("pong"));
        assert_eq!(dispatch("PING", &ctx).await, Reply::new("pong"));
        assert_eq!(ctx.backend.calls(), 0);
    }
}
