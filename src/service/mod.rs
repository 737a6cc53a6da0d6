//! Service layer between the bot commands and the repositories and draft registry.

pub mod draft;
pub mod player;
pub mod settings;

#[cfg(test)]
mod test;
