//! Engine module for `argot`.
//! See the `argot` crate documentation for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod error;
mod matcher;
mod model;
mod namespace;
mod parser;
#[allow(missing_docs)]
pub mod prelude;

pub use api::*;
pub use error::{ConfigError, ParseError};
pub use model::{ArgumentKind, ArgumentSpec, Nargs};
pub use namespace::Namespace;
pub use parser::{ActionContext, ConsoleInterface, GeneralParser, UserInterface};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
