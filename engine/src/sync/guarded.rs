use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use super::lock::Lock;
use super::resource::{Resource, ResourceError};

/// A value that can only be reached while holding its single-permit [`Resource`].
pub struct Guarded<T> {
    resource: Resource,
    data: UnsafeCell<T>,
}

// Safety: the data is only reachable through a `Guard`, and at most one guard exists at a time
// because the resource starts with exactly one permit and never gains another.
unsafe impl<T: Send> Send for Guarded<T> {}
unsafe impl<T: Send> Sync for Guarded<T> {}

impl<T> Guarded<T> {
    pub const fn new(data: T) -> Self {
        Self {
            resource: Resource::new(1),
            data: UnsafeCell::new(data),
        }
    }

    /// Block until the value is free.
    ///
    /// # Panics
    /// Panics if the underlying resource has failed.
    pub fn lock(&self) -> Guard<'_, T> {
        self.guard(Lock::new(&self.resource))
    }

    /// Block until the value is free, surfacing failures of the underlying resource.
    pub fn acquire(&self) -> Result<Guard<'_, T>, ResourceError> {
        Ok(self.guard(Lock::acquire(&self.resource)?))
    }

    /// Lock the value only if it is free right now.
    pub fn try_lock(&self) -> Result<Option<Guard<'_, T>>, ResourceError> {
        Ok(Lock::try_new(&self.resource)?.map(|lock| self.guard(lock)))
    }

    /// Wait at most `timeout` for the value.
    pub fn lock_timeout(&self, timeout: Duration) -> Result<Option<Guard<'_, T>>, ResourceError> {
        Ok(Lock::with_timeout(&self.resource, timeout)?.map(|lock| self.guard(lock)))
    }

    /// Exclusive access through a unique borrow needs no locking.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }

    fn guard<'a>(&'a self, lock: Lock<'a>) -> Guard<'a, T> {
        Guard {
            _lock: lock,
            data: &self.data,
        }
    }
}

impl<T: Default> Default for Guarded<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for Guarded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guarded")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

/// Access to a [`Guarded`] value. The value is released when the guard is dropped.
#[must_use = "the value is released as soon as the guard is dropped"]
pub struct Guard<'a, T> {
    _lock: Lock<'a>,
    data: &'a UnsafeCell<T>,
}

impl<T> Deref for Guard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: holding the lock makes this the only live access.
        unsafe { &*self.data.get() }
    }
}

impl<T> DerefMut for Guard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: holding the lock makes this the only live access.
        unsafe { &mut *self.data.get() }
    }
}
