//! The store, its reducer contract and listener subscriptions.
//!
//! A [`Store`] holds one state value, replaced wholesale by a [`Reducer`] on
//! every dispatched action, and notifies its listeners after each change.

mod reducer;
mod store;
mod subscription;

pub use reducer::Reducer;
pub use store::{Store, StoreBuilder};
pub use subscription::Subscription;
