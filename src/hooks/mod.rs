//! Consumer-facing hooks.
//!
//! - [`use_selector`] gives a consumer a reactive view of a slice of state
//! - [`use_dispatch`] gives it the current store's dispatch handle
//!
//! Both resolve the store through [`context`](crate::context) and fail
//! eagerly with [`BindingError`](crate::BindingError) when none is in scope.

mod dispatch;
pub mod equality;
mod selector;

pub use dispatch::{use_dispatch, Dispatch};
pub use selector::{use_selector, use_selector_with, Selected};
