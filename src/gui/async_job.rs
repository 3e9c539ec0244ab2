//! Background jobs polled from the GUI thread.

use anyhow::{anyhow, Result};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tokio::runtime::Builder;

use crate::generation::RequestGeneration;

/// Polls a background task for its single result
pub struct AsyncJob<T> {
    receiver: Option<Receiver<Result<T>>>,
}

impl<T> AsyncJob<T> {
    pub fn new(receiver: Receiver<Result<T>>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Returns Some(result) once the job has completed, None while it is still running
    pub fn poll(&mut self) -> Option<Result<T>> {
        if let Some(rx) = &self.receiver {
            match rx.try_recv() {
                Ok(res) => {
                    self.receiver = None;
                    return Some(res);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.receiver = None;
                    return Some(Err(anyhow!("Worker task disconnected")));
                }
            }
        }
        None
    }

    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }

    /// Attach the generation the job was dispatched under
    pub fn tagged(self, generation: RequestGeneration) -> TaggedJob<T> {
        TaggedJob { generation, job: self }
    }
}

/// A job remembered together with the request generation it belongs to.
///
/// The owner compares the tag against its current generation when the result
/// arrives and drops stale results.
pub struct TaggedJob<T> {
    generation: RequestGeneration,
    job: AsyncJob<T>,
}

impl<T> TaggedJob<T> {
    pub fn poll(&mut self) -> Option<(RequestGeneration, Result<T>)> {
        self.job.poll().map(|res| (self.generation, res))
    }

    pub fn is_running(&self) -> bool {
        self.job.is_running()
    }
}

/// Run `builder()` to completion on its own thread with a current-thread runtime.
///
/// The future does not need to be `Send`; only the builder crosses threads.
pub fn spawn_job<T, FutBuilder, Fut>(builder: FutBuilder) -> AsyncJob<T>
where
    T: Send + 'static,
    FutBuilder: FnOnce() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<T>> + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(builder()),
            Err(e) => Err(anyhow!("Failed to create async runtime: {}", e)),
        };
        let _ = tx.send(result);
    });
    AsyncJob::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_poll_returns_result_once() {
        let (tx, rx) = mpsc::channel();
        let mut job = AsyncJob::new(rx);
        assert!(job.poll().is_none());
        assert!(job.is_running());

        tx.send(Ok(7u32)).unwrap();
        assert_eq!(job.poll().unwrap().unwrap(), 7);
        assert!(!job.is_running());
        assert!(job.poll().is_none());
    }

    #[test]
    fn test_disconnected_worker_is_an_error() {
        let (tx, rx) = mpsc::channel::<Result<u32>>();
        let mut job = AsyncJob::new(rx);
        drop(tx);
        assert!(job.poll().unwrap().is_err());
    }

    #[test]
    fn test_spawn_job_runs_future_on_worker() {
        let mut job = spawn_job(|| async { Ok::<_, anyhow::Error>(21u64 * 2) });
        let deadline = Instant::now() + Duration::from_secs(5);
        let result = loop {
            if let Some(res) = job.poll() {
                break res;
            }
            assert!(Instant::now() < deadline, "job did not finish");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_tagged_job_reports_its_generation() {
        let (tx, rx) = mpsc::channel();
        let mut generation = RequestGeneration::new();
        let tag = generation.bump();
        let mut job = AsyncJob::new(rx).tagged(tag);
        assert!(job.poll().is_none());
        assert!(job.is_running());

        tx.send(Ok("done")).unwrap();
        let (seen, res) = job.poll().unwrap();
        assert_eq!(seen, tag);
        assert_eq!(res.unwrap(), "done");
        assert!(!job.is_running());
    }
}
