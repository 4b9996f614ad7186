use std::fmt::Write;
use strum::{EnumMessage, IntoEnumIterator};

use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::commands::{CommandName, CommandParser, CommandParserError};
use crate::reply::Reply;
use crate::server::Context;

/// Lists the supported commands. Unlike every other reply this one spans several lines.
#[derive(Debug, PartialEq)]
pub struct Help;

impl Help {
    pub fn text() -> String {
        let mut text = String::from("Available commands:");
        for name in CommandName::iter() {
            let usage = name.get_message().unwrap_or(name.as_ref());
            let about = name.get_detailed_message().unwrap_or_default();
            let _ = write!(text, "\n  {:<20} {}", usage, about);
        }
        text
    }
}

impl Executable for Help {
    async fn exec<B: Backend>(self, _ctx: &Context<B>) -> Result<Reply, BackendError> {
        Ok(Reply::new(Help::text()))
    }
}

impl TryFrom<&mut CommandParser> for Help {
    type Error = CommandParserError;

    fn try_from(_parser: &mut CommandParser) -> Result<Self, Self::Error> {
        Ok(Self)
    }
}
