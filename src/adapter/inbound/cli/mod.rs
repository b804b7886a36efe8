//! CLI module graph.

pub mod command;
pub mod health;
pub mod operator;
pub mod output;
pub mod run;
pub mod status;
pub mod submit;
