pub mod cleardb;
pub mod dbsize;
pub mod executable;
pub mod get;
pub mod help;
pub mod keys;
pub mod last;
pub mod ping;
pub mod quit;
pub mod remove;
pub mod rtkey;
pub mod save;
pub mod set;
pub mod shutdown;
pub mod status;
pub mod txkey;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;

use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

use crate::backend::{Backend, BackendError};
use crate::commands::executable::Executable;
use crate::reply::{escape, Reply};
use crate::server::Context;

use cleardb::ClearDb;
use dbsize::DbSize;
use get::Get;
use help::Help;
use keys::Keys;
use last::Last;
use ping::Ping;
use quit::Quit;
use remove::Remove;
use rtkey::RtKey;
use save::Save;
use set::Set;
use shutdown::Shutdown;
use status::Status;
use txkey::TxKey;
use version::Version;

/// Every command the server understands. The messages feed the `help` listing.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    strum_macros::EnumMessage,
)]
#[strum(serialize_all = "lowercase")]
pub enum CommandName {
    #[strum(message = "ping", detailed_message = "Check that the server is alive")]
    Ping,
    #[strum(message = "version", detailed_message = "Show the server version")]
    Version,
    #[strum(message = "set <key> <value>", detailed_message = "Store a value, which may contain spaces")]
    Set,
    #[strum(message = "get <key>", detailed_message = "Fetch a value, (nil) if absent")]
    Get,
    #[strum(message = "remove <key>", detailed_message = "Delete a key, replies 1 if it existed and 0 otherwise")]
    Remove,
    #[strum(message = "dbsize", detailed_message = "Count the stored keys")]
    DbSize,
    #[strum(message = "keys [pattern]", detailed_message = "List keys, optionally filtered by a glob pattern")]
    Keys,
    #[strum(message = "last <count>", detailed_message = "Show the last <count> entries of a full scan as key:value")]
    Last,
    #[strum(message = "cleardb", detailed_message = "Remove every key")]
    ClearDb,
    #[strum(message = "save", detailed_message = "Acknowledge a save, persistence is automatic")]
    Save,
    #[strum(message = "txkey", detailed_message = "Generate a time ordered key")]
    TxKey,
    #[strum(message = "rtkey", detailed_message = "Generate a random key")]
    RtKey,
    #[strum(message = "status", detailed_message = "Show liveness, size, uptime and backend")]
    Status,
    #[strum(message = "help", detailed_message = "Show this help")]
    Help,
    #[strum(message = "quit", detailed_message = "Close this connection")]
    Quit,
    #[strum(message = "shutdown", detailed_message = "Stop the server")]
    Shutdown,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    ClearDb(ClearDb),
    DbSize(DbSize),
    Get(Get),
    Keys(Keys),
    Last(Last),
    Remove(Remove),
    Save(Save),
    Set(Set),

    Help(Help),
    Ping(Ping),
    Quit(Quit),
    RtKey(RtKey),
    Shutdown(Shutdown),
    Status(Status),
    TxKey(TxKey),
    Version(Version),
}

impl Executable for Command {
    async fn exec<B: Backend>(self, ctx: &Context<B>) -> Result<Reply, BackendError> {
        match self {
            Command::ClearDb(cmd) => cmd.exec(ctx).await,
            Command::DbSize(cmd) => cmd.exec(ctx).await,
            Command::Get(cmd) => cmd.exec(ctx).await,
            Command::Help(cmd) => cmd.exec(ctx).await,
            Command::Keys(cmd) => cmd.exec(ctx).await,
            Command::Last(cmd) => cmd.exec(ctx).await,
            Command::Ping(cmd) => cmd.exec(ctx).await,
            Command::Quit(cmd) => cmd.exec(ctx).await,
            Command::Remove(cmd) => cmd.exec(ctx).await,
            Command::RtKey(cmd) => cmd.exec(ctx).await,
            Command::Save(cmd) => cmd.exec(ctx).await,
            Command::Set(cmd) => cmd.exec(ctx).await,
            Command::Shutdown(cmd) => cmd.exec(ctx).await,
            Command::Status(cmd) => cmd.exec(ctx).await,
            Command::TxKey(cmd) => cmd.exec(ctx).await,
            Command::Version(cmd) => cmd.exec(ctx).await,
        }
    }
}

impl TryFrom<CommandParser> for Command {
    type Error = CommandParserError;

    fn try_from(mut parser: CommandParser) -> Result<Self, Self::Error> {
        let name = CommandName::from_str(parser.name()).map_err(|_| {
            CommandParserError::UnknownCommand {
                command: parser.name().to_string(),
            }
        })?;

        let parser = &mut parser;
        match name {
            CommandName::ClearDb => ClearDb::try_from(parser).map(Command::ClearDb),
            CommandName::DbSize => DbSize::try_from(parser).map(Command::DbSize),
            CommandName::Get => Get::try_from(parser).map(Command::Get),
            CommandName::Help => Help::try_from(parser).map(Command::Help),
            CommandName::Keys => Keys::try_from(parser).map(Command::Keys),
            CommandName::Last => Last::try_from(parser).map(Command::Last),
            CommandName::Ping => Ping::try_from(parser).map(Command::Ping),
            CommandName::Quit => Quit::try_from(parser).map(Command::Quit),
            CommandName::Remove => Remove::try_from(parser).map(Command::Remove),
            CommandName::RtKey => RtKey::try_from(parser).map(Command::RtKey),
            CommandName::Save => Save::try_from(parser).map(Command::Save),
            CommandName::Set => Set::try_from(parser).map(Command::Set),
            CommandName::Shutdown => Shutdown::try_from(parser).map(Command::Shutdown),
            CommandName::Status => Status::try_from(parser).map(Command::Status),
            CommandName::TxKey => TxKey::try_from(parser).map(Command::TxKey),
            CommandName::Version => Version::try_from(parser).map(Command::Version),
        }
    }
}

/// Parses and runs one request line, turning every command level failure into reply text.
///
/// Argument checks happen while parsing, before the backend is touched, so a malformed request
/// never has partial side effects.
pub async fn dispatch<B: Backend>(line: &str, ctx: &Context<B>) -> Reply {
    let parser = CommandParser::parse(line);

    let cmd = match Command::try_from(parser) {
        Ok(cmd) => cmd,
        Err(err) => {
            debug!("Rejected request: {}", err);
            return Reply::new(err.to_string());
        }
    };

    match cmd.exec(ctx).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!("Backend failure: {}", err);
            Reply::new(format!("ERROR: {}", escape(&err.to_string())))
        }
    }
}

/// A request line split into a lower-cased command name and its positional arguments.
///
/// Tokens are separated by single spaces, so consecutive spaces produce empty arguments.
#[derive(Debug, PartialEq)]
pub struct CommandParser {
    name: String,
    args: Vec<String>,
}

impl CommandParser {
    pub fn parse(line: &str) -> CommandParser {
        let mut tokens = line.trim().split(' ');
        let name = tokens.next().unwrap_or_default().to_lowercase();
        let args = tokens.map(str::to_string).collect();

        CommandParser { name, args }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Takes the arguments if there are exactly `N` of them.
    fn exactly<const N: usize>(&mut self) -> Option<[String; N]> {
        if self.args.len() != N {
            return None;
        }
        std::mem::take(&mut self.args).try_into().ok()
    }

    /// Takes the first argument plus everything after it re-joined with single spaces. Requires
    /// at least two arguments.
    fn key_and_rest(&mut self) -> Option<(String, String)> {
        if self.args.len() < 2 {
            return None;
        }
        let mut args = std::mem::take(&mut self.args).into_iter();
        let key = args.next()?;
        let rest = args.collect::<Vec<_>>().join(" ");
        Some((key, rest))
    }

    /// Takes the first argument, if any. Anything after it is an error.
    fn optional(&mut self) -> Result<Option<String>, ()> {
        match self.args.len() {
            0 => Ok(None),
            1 => Ok(self.args.pop()),
            _ => Err(()),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandParserError {
    #[error("ERROR: \"{command}\" command requires {requirement}.")]
    MissingArguments {
        command: CommandName,
        requirement: &'static str,
    },
    #[error("ERROR: \"{command}\" command requires {requirement}.")]
    InvalidArgument {
        command: CommandName,
        requirement: &'static str,
    },
    #[error("ERROR: \"{command}\" command accepts {limit}.")]
    TooManyArguments {
        command: CommandName,
        limit: &'static str,
    },
    #[error("Unknown command: {command}")]
    UnknownCommand { command: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::Action;

    #[test]
    fn parse_splits_name_and_args() {
        let parser = CommandParser::parse("  SET greeting hello world \n");

        assert_eq!(parser.name(), "set");
        assert_eq!(parser.args(), ["greeting", "hello", "world"]);
    }

    #[test]
    fn parse_keeps_empty_tokens_between_spaces() {
        let parser = CommandParser::parse("get  key");

        assert_eq!(parser.name(), "get");
        assert_eq!(parser.args(), ["", "key"]);
    }

    #[test]
    fn parse_empty_line() {
        let parser = CommandParser::parse("");

        assert_eq!(parser.name(), "");
        assert!(parser.args().is_empty());
    }

    #[test]
    fn key_and_rest_rejoins_value() {
        let mut parser = CommandParser::parse("set k a b  c");

        assert_eq!(
            parser.key_and_rest(),
            Some(("k".to_string(), "a b  c".to_string()))
        );
    }

    #[test]
    fn command_names_are_case_insensitive() {
        let lower = Command::try_from(CommandParser::parse("ping")).unwrap();
        let upper = Command::try_from(CommandParser::parse("PING")).unwrap();
        let mixed = Command::try_from(CommandParser::parse("PiNg")).unwrap();

        assert_eq!(lower, Command::Ping(Ping));
        assert_eq!(upper, lower);
        assert_eq!(mixed, lower);
    }

    #[test]
    fn unknown_command() {
        let err = Command::try_from(CommandParser::parse("foo bar")).unwrap_err();

        assert_eq!(
            err,
            CommandParserError::UnknownCommand {
                command: "foo".to_string()
            }
        );
        assert_eq!(err.to_string(), "Unknown command: foo");
    }

    #[test]
    fn empty_line_is_an_unknown_command() {
        let err = Command::try_from(CommandParser::parse("")).unwrap_err();

        assert_eq!(err.to_string(), "Unknown command: ");
    }

    #[test]
    fn every_name_parses_back() {
        use strum::IntoEnumIterator;

        for name in CommandName::iter() {
            assert_eq!(CommandName::from_str(name.as_ref()), Ok(name));
        }
        assert_eq!(CommandName::ClearDb.to_string(), "cleardb");
        assert_eq!(CommandName::DbSize.to_string(), "dbsize");
    }

    #[tokio::test]
    async fn dispatch_reports_backend_failures() {
        let ctx = testing::failing_context();

        let reply = dispatch("get key", &ctx).await;
        assert!(reply.text().starts_with("ERROR: "), "{}", reply.text());
        assert_eq!(reply.action(), Action::Continue);

        let reply = dispatch("dbsize", &ctx).await;
        assert!(reply.text().starts_with("ERROR: "), "{}", reply.text());
    }

    #[tokio::test]
    async fn dispatch_unknown_command() {
        let ctx = testing::context();

        let reply = dispatch("FOO", &ctx).await;
        assert_eq!(reply, Reply::new("Unknown command: foo"));
        assert_eq!(ctx.backend.calls(), 0);
    }
}
