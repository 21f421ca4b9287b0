mod action;
mod core;
mod parameter;

pub use self::core::*;
pub use action::*;
pub use parameter::*;
