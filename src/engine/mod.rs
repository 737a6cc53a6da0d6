//! Draft lifecycle engine.
//!
//! `draft` holds the pure state machine, `runtime` drives one draft with timers and
//! coalesced side effects, and `registry` tracks the running draft of each guild.
//! Persistence and the chat surface are reached only through the traits in `port`.

pub mod clock;
pub mod draft;
pub mod port;
pub mod registry;
pub mod roster;
pub mod runtime;
pub mod team;
pub mod timer;
pub mod usage;
pub mod view;

#[cfg(test)]
pub(crate) mod test;
