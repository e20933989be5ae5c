//! Generic event notifier.
//!
//! The subscriber list is copy-on-write: subscribe and unsubscribe swap in a new
//! list under a short write lock, while `notify` takes a snapshot and releases
//! the lock before invoking any callback. A callback may therefore subscribe or
//! unsubscribe while being notified; the change applies from the next `notify`.

use std::{
	any::Any,
	collections::HashMap,
	fmt,
	panic::{catch_unwind, AssertUnwindSafe},
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc, PoisonError, RwLock, Weak,
	},
};

use crate::services::notification::{SubscriberError, SubscriberFailure};

/// Callback invoked for every notified event
pub type SubscriptionCallback<E> =
	Arc<dyn Fn(&E) -> Result<(), SubscriberFailure> + Send + Sync>;

struct Subscriber<E> {
	id: u64,
	callback: SubscriptionCallback<E>,
}

impl<E> Clone for Subscriber<E> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			callback: Arc::clone(&self.callback),
		}
	}
}

struct Subscribers<E> {
	list: RwLock<Arc<Vec<Subscriber<E>>>>,
	next_id: AtomicU64,
}

impl<E> Subscribers<E> {
	fn snapshot(&self) -> Arc<Vec<Subscriber<E>>> {
		Arc::clone(&self.list.read().unwrap_or_else(PoisonError::into_inner))
	}

	/// Applies `change` to a copy of the list and publishes the copy if `change` returns true
	fn update(&self, change: impl FnOnce(&mut Vec<Subscriber<E>>) -> bool) -> bool {
		let mut guard = self.list.write().unwrap_or_else(PoisonError::into_inner);
		let mut next = Vec::clone(&guard);
		let changed = change(&mut next);
		if changed {
			*guard = Arc::new(next);
		}
		changed
	}

	fn remove_id(&self, id: u64) -> bool {
		self.update(|list| match list.iter().position(|s| s.id == id) {
			Some(index) => {
				list.remove(index);
				true
			}
			None => false,
		})
	}
}

/// Synchronous publish/subscribe over events of type `E`
///
/// Clones share the same subscriber list.
pub struct EventNotifier<E> {
	subscribers: Arc<Subscribers<E>>,
}

impl<E> EventNotifier<E> {
	pub fn new() -> Self {
		Self {
			subscribers: Arc::new(Subscribers {
				list: RwLock::new(Arc::new(Vec::new())),
				next_id: AtomicU64::new(1),
			}),
		}
	}

	/// Appends `callback` to the subscriber list
	///
	/// The same callback may be subscribed more than once; each subscription is
	/// delivered to and removed independently.
	pub fn subscribe(&self, callback: SubscriptionCallback<E>) -> Subscription<E> {
		let id = self.subscribers.next_id.fetch_add(1, Ordering::Relaxed);
		self.subscribers.update(|list| {
			list.push(Subscriber { id, callback });
			true
		});
		Subscription {
			subscribers: Arc::downgrade(&self.subscribers),
			id,
		}
	}

	/// Removes the first subscription of `callback`, compared by pointer
	///
	/// Returns false if the callback is not subscribed.
	pub fn unsubscribe(&self, callback: &SubscriptionCallback<E>) -> bool {
		self.subscribers.update(|list| {
			match list.iter().position(|s| Arc::ptr_eq(&s.callback, callback)) {
				Some(index) => {
					list.remove(index);
					true
				}
				None => false,
			}
		})
	}

	/// Delivers `event` to every current subscriber in subscription order
	///
	/// A subscriber that returns an error or panics is logged and skipped. Panics
	/// are only caught when the crate is built with `panic = "unwind"`.
	pub fn notify(&self, event: &E) {
		let snapshot = self.subscribers.snapshot();
		for subscriber in snapshot.iter() {
			let outcome = catch_unwind(AssertUnwindSafe(|| (subscriber.callback)(event)));
			let metadata = || {
				Some(HashMap::from([(
					"subscriber_id".to_string(),
					subscriber.id.to_string(),
				)]))
			};
			match outcome {
				Ok(Ok(())) => {}
				Ok(Err(failure)) => {
					SubscriberError::callback_failed(
						"Subscriber returned an error",
						Some(failure),
						metadata(),
					);
				}
				Err(panic) => {
					SubscriberError::callback_panicked(panic_message(panic.as_ref()), metadata());
				}
			}
		}
	}

	pub fn subscriber_count(&self) -> usize {
		self.subscribers.snapshot().len()
	}
}

impl<E> Clone for EventNotifier<E> {
	fn clone(&self) -> Self {
		Self {
			subscribers: Arc::clone(&self.subscribers),
		}
	}
}

impl<E> Default for EventNotifier<E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<E> fmt::Debug for EventNotifier<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventNotifier")
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

/// Handle removing one subscription from its notifier
///
/// Dropping the handle keeps the subscription active. The handle does not keep
/// the notifier alive.
pub struct Subscription<E> {
	subscribers: Weak<Subscribers<E>>,
	id: u64,
}

impl<E> Subscription<E> {
	/// Removes this subscription; later calls are no-ops
	///
	/// Returns true if the subscription was still active.
	pub fn unsubscribe(&self) -> bool {
		match self.subscribers.upgrade() {
			Some(subscribers) => subscribers.remove_id(self.id),
			None => false,
		}
	}

	pub fn is_active(&self) -> bool {
		self.subscribers
			.upgrade()
			.is_some_and(|subscribers| subscribers.snapshot().iter().any(|s| s.id == self.id))
	}
}

impl<E> fmt::Debug for Subscription<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription").field("id", &self.id).finish()
	}
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
	if let Some(message) = panic.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message.clone()
	} else {
		"non-string panic payload".to_string()
	}
}
