pub mod events;
pub mod settings;
pub mod slot;
pub mod state;
