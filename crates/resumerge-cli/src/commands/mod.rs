pub mod config;
pub mod extract;
pub mod fetch;
pub mod rules;
pub mod update;
