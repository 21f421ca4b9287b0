mod base;
mod classifier;
mod conflict;
mod dispatch;
mod interface;
mod middleware;
mod printer;

pub use base::ActionContext;
pub(crate) use base::{Declared, Parser, Settings};
pub(crate) use conflict::ExclusiveGroup;
pub(crate) use dispatch::SubCommandAction;
pub use interface::{ConsoleInterface, UserInterface};
pub use middleware::GeneralParser;

#[cfg(test)]
pub(crate) use interface::util;
