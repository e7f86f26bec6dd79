use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, error};

use super::engine::EngineError;

/// A cloneable cancellation flag shared by every thread of an engine run.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this token to wind down.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Stops the token when dropped, including while unwinding from a panic, so one failed thread
/// brings the others down with it.
struct StopOnExit(StopToken);

impl Drop for StopOnExit {
    fn drop(&mut self) {
        if thread::panicking() {
            error!(
                "thread {:?} panicked, stopping the engine",
                thread::current().name().unwrap_or("<unnamed>")
            );
        }
        self.0.stop();
    }
}

/// Managed thread used within the engine. The work function is called over and over until
/// the thread's [`StopToken`] is stopped. Pacing is up to the work function.
#[derive(Debug)]
pub struct EngineThread {
    name: String,
    handle: Option<JoinHandle<()>>,
    token: StopToken,
}

impl EngineThread {
    pub fn spawn<W>(name: impl Into<String>, token: StopToken, mut work: W) -> Result<Self, EngineError>
    where
        W: FnMut() + Send + 'static,
    {
        let name = name.into();
        let thread_token = token.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let _exit = StopOnExit(thread_token.clone());
                debug!("thread started");
                while !thread_token.is_stopped() {
                    work();
                }
                debug!("thread stopped");
            })
            .map_err(EngineError::Spawn)?;

        Ok(Self {
            name,
            handle: Some(handle),
            token,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the thread, along with every other thread sharing its token.
    pub fn stop(&self) {
        self.token.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|handle| handle.is_finished())
    }

    /// Wait for the thread to exit. Joining twice is a no-op.
    pub fn join(&mut self) -> Result<(), EngineError> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| EngineError::ThreadPanicked(self.name.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn runs_work_until_stopped() {
        // Given
        let token = StopToken::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        // When
        let mut thread = EngineThread::spawn("worker", token.clone(), move || {
            counter.fetch_add(1, Ordering::Relaxed);
            thread::sleep(Duration::from_millis(1));
        })
        .unwrap();
        thread::sleep(Duration::from_millis(20));
        thread.stop();
        thread.join().unwrap();

        // Then
        let seen = count.load(Ordering::Relaxed);
        assert!(seen > 0);
        assert!(token.is_stopped());
        assert!(thread.is_finished());
        thread::sleep(Duration::from_millis(5));
        assert_eq!(count.load(Ordering::Relaxed), seen);
    }

    #[test]
    fn stopped_token_skips_work() {
        let token = StopToken::new();
        token.stop();
        let mut thread = EngineThread::spawn("idle", token, || panic!("should not run")).unwrap();
        assert!(thread.join().is_ok());
    }

    #[test]
    fn panics_stop_siblings_and_are_reported() {
        // Given
        let token = StopToken::new();
        let mut sibling = EngineThread::spawn("sibling", token.clone(), || {
            thread::sleep(Duration::from_millis(1));
        })
        .unwrap();

        // When
        let mut failing = EngineThread::spawn("failing", token.clone(), || panic!("boom")).unwrap();

        // Then
        match failing.join() {
            Err(EngineError::ThreadPanicked(name)) => assert_eq!(name, "failing"),
            other => panic!("unexpected join result: {other:?}"),
        }
        assert!(token.is_stopped());
        assert!(sibling.join().is_ok());
        assert!(failing.join().is_ok());
    }

    #[test]
    fn threads_carry_their_name() {
        let token = StopToken::new();
        let (sender, receiver) = crossbeam::channel::bounded(1);
        let stopper = token.clone();
        let mut thread = EngineThread::spawn("named", token, move || {
            let _ = sender.try_send(thread::current().name().map(String::from));
            stopper.stop();
        })
        .unwrap();
        thread.join().unwrap();

        assert_eq!(thread.name(), "named");
        assert_eq!(receiver.recv().unwrap().as_deref(), Some("named"));
    }
}
