//! Scoped locking built on a counting semaphore.
//!
//! - [`Resource`] is the semaphore. One permit by default, which makes it a mutex.
//! - [`Lock`] acquires a resource for the lifetime of a scope.
//! - [`Guarded`] ties a value to its own resource so the value can't be touched unlocked.
//!
//! A lock that could not be taken because someone else holds it is a normal outcome and is
//! reported as `false`/`None`. A [`ResourceError`] means the semaphore itself is broken.

mod guarded;
mod lock;
mod resource;

pub use guarded::{Guard, Guarded};
pub use lock::Lock;
pub use resource::{Resource, ResourceError};
