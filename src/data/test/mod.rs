mod draft;
mod guild_settings;
mod player;
