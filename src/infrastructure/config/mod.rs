//! Infrastructure configuration modules.

pub mod broker;
pub mod logging;
pub mod settings;
