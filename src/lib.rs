pub mod battle;
pub mod config;
pub mod console;
pub mod error;
pub mod input;
pub mod time;
