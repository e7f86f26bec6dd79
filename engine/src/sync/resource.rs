use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Failures of the semaphore itself. Failing to acquire under contention is not one of these:
/// [`Resource::try_wait`] and [`Resource::wait_timeout`] report that as `Ok(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceError {
    /// A thread panicked while holding the semaphore's internal state.
    Poisoned,
    /// Releasing would push the permit count past `u32::MAX`.
    Overflow,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResourceError::Poisoned => write!(f, "resource state poisoned by a panicked thread"),
            ResourceError::Overflow => write!(f, "resource permit count overflowed"),
        }
    }
}

impl std::error::Error for ResourceError {}

/// A counting semaphore. With the default single permit it behaves as a mutex that is not tied
/// to any data; [`super::Lock`] provides scoped acquisition on top of it.
#[derive(Debug)]
pub struct Resource {
    permits: Mutex<u32>,
    available: Condvar,
}

impl Resource {
    pub const fn new(permits: u32) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, u32>, ResourceError> {
        self.permits.lock().map_err(|_| ResourceError::Poisoned)
    }

    /// Block until a permit is available and take it.
    pub fn wait(&self) -> Result<(), ResourceError> {
        let mut permits = self.state()?;
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .map_err(|_| ResourceError::Poisoned)?;
        }
        *permits -= 1;
        Ok(())
    }

    /// Return a permit, waking one waiter.
    pub fn post(&self) -> Result<(), ResourceError> {
        let mut permits = self.state()?;
        *permits = permits.checked_add(1).ok_or(ResourceError::Overflow)?;
        drop(permits);
        self.available.notify_one();
        Ok(())
    }

    /// Take a permit if one is available right now.
    pub fn try_wait(&self) -> Result<bool, ResourceError> {
        let mut permits = self.state()?;
        if *permits == 0 {
            return Ok(false);
        }
        *permits -= 1;
        Ok(true)
    }

    /// Wait at most `timeout` for a permit. Returns whether one was taken.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<bool, ResourceError> {
        let deadline = Instant::now() + timeout;
        let mut permits = self.state()?;
        while *permits == 0 {
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            let (guard, _) = self
                .available
                .wait_timeout(permits, deadline - now)
                .map_err(|_| ResourceError::Poisoned)?;
            permits = guard;
        }
        *permits -= 1;
        Ok(true)
    }

    /// The number of permits currently available.
    pub fn value(&self) -> Result<u32, ResourceError> {
        Ok(*self.state()?)
    }
}

impl Default for Resource {
    fn default() -> Self {
        Self::new(1)
    }
}
