//! Command parser - Classify chat text into bot commands and lookups

use std::fmt;

use domain::{DomainError, LineNumber, StopCode};
use tracing::{debug, instrument};

/// Slash commands understood by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `/start`: greeting and usage
    Start,
    /// `/help`: usage
    Help,
    /// `/stops [N]`: set the number of nearby stops, asking for it when missing
    SetStops(Option<String>),
    /// `/cancel`: abort the pending settings question
    Cancel,
    /// Any other slash command
    Unknown(String),
}

/// Result of classifying a text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    /// A slash command
    Command(BotCommand),
    /// A stop code lookup
    Stop(StopCode),
    /// A line schedule lookup
    Line(LineNumber),
    /// Text that is neither a command nor a valid identifier
    Invalid(DomainError),
}

/// Parser for converting chat text into [`ParsedInput`]
pub struct CommandParser {
    /// Command names and the builder for each
    commands: Vec<CommandPattern>,
}

impl fmt::Debug for CommandParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandParser")
            .field("commands_count", &self.commands.len())
            .finish()
    }
}

/// A slash command name with its aliases
struct CommandPattern {
    /// Names that trigger this command (without the slash)
    names: &'static [&'static str],
    /// Function to build the command from the argument text
    builder: fn(Option<&str>) -> BotCommand,
}

impl CommandParser {
    /// Create a new command parser
    pub fn new() -> Self {
        Self {
            commands: Self::build_commands(),
        }
    }

    fn build_commands() -> Vec<CommandPattern> {
        vec![
            CommandPattern {
                names: &["start"],
                builder: |_| BotCommand::Start,
            },
            CommandPattern {
                names: &["help", "aiuto"],
                builder: |_| BotCommand::Help,
            },
            CommandPattern {
                names: &["stops", "numero_fermate"],
                builder: |arg| BotCommand::SetStops(arg.map(str::to_string)),
            },
            CommandPattern {
                names: &["cancel", "annulla"],
                builder: |_| BotCommand::Cancel,
            },
        ]
    }

    /// Classify a text message
    ///
    /// Four ASCII digits are a stop code; any other short alphanumeric token
    /// containing a digit is a line number; text starting with `/` is a
    /// command. Everything else is invalid.
    #[instrument(skip(self), level = "debug")]
    pub fn parse(&self, input: &str) -> ParsedInput {
        let trimmed = input.trim();

        if let Some(command_text) = trimmed.strip_prefix('/') {
            return ParsedInput::Command(self.parse_command(command_text));
        }

        if StopCode::is_stop_code(trimmed) {
            return match StopCode::parse(trimmed) {
                Ok(code) => ParsedInput::Stop(code),
                Err(e) => ParsedInput::Invalid(e),
            };
        }

        match LineNumber::parse(trimmed) {
            Ok(line) => ParsedInput::Line(line),
            Err(e) => {
                debug!(input = %trimmed, "Text is neither a stop code nor a line");
                ParsedInput::Invalid(e)
            },
        }
    }

    fn parse_command(&self, text: &str) -> BotCommand {
        let (head, arg) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (text, None),
        };
        // Group chats append the bot username: `/stops@FermataBot 3`
        let name = head.split('@').next().unwrap_or(head).to_lowercase();

        self.commands
            .iter()
            .find(|pattern| pattern.names.contains(&name.as_str()))
            .map_or_else(|| BotCommand::Unknown(name), |pattern| (pattern.builder)(arg))
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}
