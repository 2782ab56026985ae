pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod sensors;
pub mod source;
pub mod utils;

pub use error::{Result, SaihError};
