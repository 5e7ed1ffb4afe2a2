pub mod analyzers;
pub mod chat;
pub mod config;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod output;
pub mod parser;
