//! Domain models shared by the engine, repositories, and bot layer.

pub mod draft;
pub mod notification;
pub mod player;
pub mod settings;
