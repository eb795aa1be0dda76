//! A small interactive calculator whose user name, output precision and
//! permitted operators are kept in a settings file.

pub mod cli;
pub mod eval;
pub mod format;
pub mod session;
pub mod settings;

pub use eval::{evaluate, EvalError, Expression, Malformed};
pub use format::{format_result, render};
pub use session::Session;
pub use settings::{AllowedOperations, Settings, SettingsStore, StoreError};
