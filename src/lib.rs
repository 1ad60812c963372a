//! This is a plugin for Bevy game engine to setup and handle the logic for calculating FlowFields that lead actors towards a set of exits, falling back to destructible obstacles when an exit cannot be reached
//!

pub mod flowfields;
pub mod bundle;
pub mod plugin;

pub mod prelude;
