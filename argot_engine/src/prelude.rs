//! Traits which, typically, may be imported without concern: `use argot::prelude::*`.

pub use crate::api::{
    Action, Append, AppendConst, Count, Help, Store, StoreConst, StoreFalse, StoreTrue,
};

/// Behaviour for documenting choices on a `Parameter`.
// Needs to be imported in order to document choices.
pub trait Choices<T> {
    fn choice(self, variant: T, description: impl Into<String>) -> Self;
}
