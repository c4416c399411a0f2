use thiserror::Error;

pub const APPEAL_USAGE: &str =
    "/appeal <explanation>\nExample: /appeal I was discussing race strategy, not insulting anyone.";
pub const APPROVE_USAGE: &str = "/approve <appeal id>";
pub const REJECT_USAGE: &str = "/reject <appeal id> <reason>";
pub const INFO_USAGE: &str = "/info <appeal id>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Appeal { text: String },
    Status,
    Approve { appeal_id: i32 },
    Reject { appeal_id: i32, reason: String },
    Info { appeal_id: i32 },
    Pending,
    Stats,
}

impl Command {
    pub fn is_moderator_command(&self) -> bool {
        matches!(
            self,
            Command::Approve { .. }
                | Command::Reject { .. }
                | Command::Info { .. }
                | Command::Pending
                | Command::Stats
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid appeal ID: {0}")]
    InvalidId(String),
}

impl CommandError {
    /// Only the moderator commands take an appeal id.
    pub fn is_moderator_command(&self) -> bool {
        match self {
            CommandError::Usage(usage) => *usage != APPEAL_USAGE,
            CommandError::InvalidId(_) => true,
        }
    }
}

/// Parses a chat message into a command.
///
/// Returns `None` for ordinary text and for commands the bot does not know.
/// Accepts the `/command@BotName` form used in groups.
pub fn parse_command(text: &str) -> Option<Result<Command, CommandError>> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;

    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or_default();

    let command = match name.to_ascii_lowercase().as_str() {
        "start" => Ok(Command::Start),
        "help" => Ok(Command::Help),
        "appeal" => {
            if args.is_empty() {
                Err(CommandError::Usage(APPEAL_USAGE))
            } else {
                Ok(Command::Appeal {
                    text: args.to_string(),
                })
            }
        }
        "status" => Ok(Command::Status),
        "approve" => parse_id(args, APPROVE_USAGE).map(|(appeal_id, _)| Command::Approve { appeal_id }),
        "reject" => parse_id(args, REJECT_USAGE).map(|(appeal_id, reason)| Command::Reject {
            appeal_id,
            reason: reason.to_string(),
        }),
        "info" => parse_id(args, INFO_USAGE).map(|(appeal_id, _)| Command::Info { appeal_id }),
        "pending" => Ok(Command::Pending),
        "stats" => Ok(Command::Stats),
        _ => return None,
    };
    Some(command)
}

/// Splits `"<id> <rest>"`, tolerating a leading `#` on the id.
fn parse_id<'a>(args: &'a str, usage: &'static str) -> Result<(i32, &'a str), CommandError> {
    if args.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    let (raw_id, rest) = match args.split_once(char::is_whitespace) {
        Some((id, rest)) => (id, rest.trim()),
        None => (args, ""),
    };
    let appeal_id = raw_id
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidId(raw_id.to_string()))?;
    Ok((appeal_id, rest))
}
