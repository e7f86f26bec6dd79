use std::time::Duration;

use log::error;

use super::resource::{Resource, ResourceError};

/// Scoped acquisition of a [`Resource`]. The permit is taken when the lock is created and
/// returned when it is dropped, on every exit path including unwinding.
///
/// Locks can't be cloned or copied; hold one only for the resources a code path touches.
#[must_use = "the resource is released as soon as the lock is dropped"]
#[derive(Debug)]
pub struct Lock<'a> {
    resource: &'a Resource,
}

impl<'a> Lock<'a> {
    /// Block until `resource` is acquired.
    ///
    /// # Panics
    /// Panics if the resource itself has failed (see [`ResourceError`]). Use [`Lock::acquire`]
    /// to handle that case.
    pub fn new(resource: &'a Resource) -> Self {
        match Self::acquire(resource) {
            Ok(lock) => lock,
            Err(err) => panic!("failed to lock resource: {err}"),
        }
    }

    /// Block until `resource` is acquired, surfacing failures of the resource.
    pub fn acquire(resource: &'a Resource) -> Result<Self, ResourceError> {
        resource.wait()?;
        Ok(Self { resource })
    }

    /// Acquire `resource` only if it is free right now.
    pub fn try_new(resource: &'a Resource) -> Result<Option<Self>, ResourceError> {
        Ok(resource.try_wait()?.then(|| Self { resource }))
    }

    /// Wait at most `timeout` for `resource`.
    pub fn with_timeout(resource: &'a Resource, timeout: Duration) -> Result<Option<Self>, ResourceError> {
        Ok(resource.wait_timeout(timeout)?.then(|| Self { resource }))
    }
}

impl Drop for Lock<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.resource.post() {
            error!("failed to release resource: {err}");
        }
    }
}
