//! Slash command definitions and execution.
//!
//! Each submodule owns one top-level command: its `definition` registered with Discord
//! on ready, and a `run` function returning the text replied to the invoking member.
//! Option parsing and the invocation context shared by all commands live here.

pub mod draft;
pub mod player;
pub mod settings;
pub mod team;

use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, ResolvedOption,
    ResolvedValue,
};

use crate::error::AppError;

/// Every command registered globally on ready.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        draft::definition(),
        team::definition(),
        player::definition(),
        settings::definition(),
    ]
}

/// A member picked through a user option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionUser {
    pub id: u64,
    /// Guild nickname when available, otherwise the global display name.
    pub name: String,
}

/// Resolved options of one command or subcommand.
pub struct Options<'a> {
    options: Vec<ResolvedOption<'a>>,
}

impl<'a> Options<'a> {
    fn value(&self, name: &str) -> Option<&ResolvedValue<'a>> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .map(|option| &option.value)
    }

    pub fn string(&self, name: &str) -> Option<&'a str> {
        match self.value(name)? {
            ResolvedValue::String(value) => Some(*value),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.value(name)? {
            ResolvedValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            ResolvedValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn user(&self, name: &str) -> Option<OptionUser> {
        match self.value(name)? {
            ResolvedValue::User(user, member) => Some(OptionUser {
                id: user.id.get(),
                name: (*member)
                    .and_then(|m| m.nick.clone())
                    .unwrap_or_else(|| user.display_name().to_string()),
            }),
            _ => None,
        }
    }

    pub fn role(&self, name: &str) -> Option<u64> {
        match self.value(name)? {
            ResolvedValue::Role(role) => Some(role.id.get()),
            _ => None,
        }
    }

    pub fn channel(&self, name: &str) -> Option<u64> {
        match self.value(name)? {
            ResolvedValue::Channel(channel) => Some(channel.id.get()),
            _ => None,
        }
    }

    pub fn required_user(&self, name: &str) -> Result<OptionUser, AppError> {
        self.user(name).ok_or_else(|| missing(name))
    }

    pub fn required_integer(&self, name: &str) -> Result<i64, AppError> {
        self.integer(name).ok_or_else(|| missing(name))
    }

    /// Reads the `team` option as a team number.
    pub fn team(&self) -> Result<u8, AppError> {
        let team = self.required_integer("team")?;
        u8::try_from(team).map_err(|_| AppError::BadRequest(format!("Invalid team {}", team)))
    }

    /// Name and printable value of every supplied option, in the order given.
    pub fn describe(&self) -> Vec<(String, String)> {
        self.options
            .iter()
            .map(|option| {
                let value = match &option.value {
                    ResolvedValue::String(value) => value.to_string(),
                    ResolvedValue::Integer(value) => value.to_string(),
                    ResolvedValue::Boolean(value) => value.to_string(),
                    ResolvedValue::User(user, _) => format!("{} ({})", user.name, user.id),
                    ResolvedValue::Role(role) => format!("@{} ({})", role.name, role.id),
                    ResolvedValue::Channel(channel) => channel
                        .name
                        .clone()
                        .map(|name| format!("#{} ({})", name, channel.id))
                        .unwrap_or_else(|| channel.id.to_string()),
                    _ => "?".to_string(),
                };
                (option.name.to_string(), value)
            })
            .collect()
    }
}

fn missing(name: &str) -> AppError {
    AppError::BadRequest(format!("Missing option '{}'", name))
}

/// Who ran a command, where, and with what.
pub struct Invocation<'a> {
    pub command: &'a str,
    /// Subcommand name, empty for commands without subcommands.
    pub subcommand: &'a str,
    pub guild_id: u64,
    pub channel_id: u64,
    pub user_id: u64,
    pub display_name: String,
    pub roles: Vec<u64>,
    pub options: Options<'a>,
}

impl<'a> Invocation<'a> {
    /// Reads the invocation context out of a slash command interaction.
    ///
    /// # Returns
    /// - `Ok(Invocation)` - Command was used inside a guild
    /// - `Err(AppError::BadRequest)` - Command was used in a direct message
    pub fn from_command(command: &'a CommandInteraction) -> Result<Self, AppError> {
        let guild_id = command.guild_id.ok_or_else(|| {
            AppError::BadRequest("Draft commands can only be used in a server".to_string())
        })?;

        let mut options = command.data.options();
        let has_subcommand = matches!(
            options.first().map(|option| &option.value),
            Some(ResolvedValue::SubCommand(_))
        );
        let (subcommand, options) = if has_subcommand {
            let first = options.remove(0);
            match first.value {
                ResolvedValue::SubCommand(nested) => (first.name, nested),
                _ => ("", Vec::new()),
            }
        } else {
            ("", options)
        };

        let (display_name, roles) = match &command.member {
            Some(member) => (
                member.display_name().to_string(),
                member.roles.iter().map(|role| role.get()).collect(),
            ),
            None => (command.user.display_name().to_string(), Vec::new()),
        };

        Ok(Self {
            command: &command.data.name,
            subcommand,
            guild_id: guild_id.get(),
            channel_id: command.channel_id.get(),
            user_id: command.user.id.get(),
            display_name,
            roles,
            options: Options { options },
        })
    }
}

fn user_option(name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::User, name, description).required(true)
}

fn team_option() -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Integer, "team", "Team number")
        .required(true)
        .min_int_value(1)
        .max_int_value(2)
}

fn subcommand(name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::SubCommand, name, description)
}
