//! In-process publish/subscribe.
//!
//! [`EventNotifier`] fans events out to callbacks synchronously, in subscription
//! order. Failing subscribers are logged and skipped.

mod error;
mod notifier;

pub use error::{SubscriberError, SubscriberFailure};
pub use notifier::{EventNotifier, Subscription, SubscriptionCallback};
