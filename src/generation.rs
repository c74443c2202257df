//! Hand-off of the exported composite to a generative backend.
//!
//! The backend is anything implementing [`Generator`]. Its future runs to
//! completion on a dedicated worker thread and the outcome comes back over a
//! oneshot channel that the UI thread checks once per frame.

use std::sync::Arc;
use std::thread;

use futures::channel::oneshot;
use futures::future::BoxFuture;
use log::{error, info};

use crate::error::{JobError, TransferError};

/// Image produced by a successful job
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    /// Backend-side name of the output, e.g. `ComfyUI_00042_.png`
    pub reference: String,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
}

/// A generative-image backend: upload, queue, poll and fetch behind one call.
///
/// Failures reported by the job itself are `JobError::Generation` and are
/// shown to the user verbatim. Anything else is `JobError::Transfer`.
pub trait Generator: Send + Sync {
    fn generate(&self, png: Vec<u8>) -> BoxFuture<'static, Result<GeneratedImage, JobError>>;
}

type JobResult = Result<GeneratedImage, JobError>;

/// A generation running on its worker thread
#[derive(Debug)]
pub struct GenerationTask {
    receiver: oneshot::Receiver<JobResult>,
}

impl GenerationTask {
    /// Start `generator` on `png` in a background thread
    pub fn spawn(generator: Arc<dyn Generator>, png: Vec<u8>) -> Result<Self, TransferError> {
        let (sender, receiver) = oneshot::channel::<JobResult>();
        let size = png.len();
        let future = generator.generate(png);

        thread::Builder::new()
            .name("generation".to_string())
            .spawn(move || {
                let result = futures::executor::block_on(future);
                match &result {
                    Ok(image) => info!("✅ Generation finished: {}", image.reference),
                    Err(e) => error!("Generation failed: {}", e),
                }
                // The receiver is gone if the editor shut down; nothing to report to
                let _ = sender.send(result);
            })?;

        info!("🚀 Generation started with {} byte composite", size);
        Ok(Self { receiver })
    }

    /// Non-blocking check for the outcome. `None` while the job is still running.
    pub fn poll(&mut self) -> Option<JobResult> {
        match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(Err(TransferError::Disconnected.into())),
        }
    }

    /// Block until the job finishes
    #[cfg(test)]
    pub fn wait(self) -> JobResult {
        futures::executor::block_on(self.receiver)
            .unwrap_or_else(|oneshot::Canceled| Err(TransferError::Disconnected.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use futures::FutureExt;

    struct Echo;

    impl Generator for Echo {
        fn generate(&self, png: Vec<u8>) -> BoxFuture<'static, JobResult> {
            futures::future::ready(Ok(GeneratedImage {
                reference: "echo.png".to_string(),
                bytes: png,
            }))
            .boxed()
        }
    }

    struct Failing;

    impl Generator for Failing {
        fn generate(&self, _png: Vec<u8>) -> BoxFuture<'static, JobResult> {
            let error = GenerationError {
                kind: "RuntimeError".to_string(),
                node: Some("KSampler (ID: 3)".to_string()),
                message: "out of memory".to_string(),
                trace: None,
            };
            futures::future::ready(Err(JobError::from(error))).boxed()
        }
    }

    struct Panicking;

    impl Generator for Panicking {
        fn generate(&self, _png: Vec<u8>) -> BoxFuture<'static, JobResult> {
            futures::future::lazy(|_| -> JobResult { panic!("backend crashed") }).boxed()
        }
    }

    #[test]
    fn test_success_round_trip() {
        let task = GenerationTask::spawn(Arc::new(Echo), vec![1, 2, 3]).unwrap();
        let image = task.wait().unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.reference, "echo.png");
    }

    #[test]
    fn test_job_error_is_forwarded() {
        let task = GenerationTask::spawn(Arc::new(Failing), Vec::new()).unwrap();
        match task.wait() {
            Err(JobError::Generation(e)) => {
                assert_eq!(e.kind, "RuntimeError");
                assert_eq!(e.node.as_deref(), Some("KSampler (ID: 3)"));
                assert_eq!(e.to_string(), "RuntimeError: out of memory");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_dead_worker_reports_disconnect() {
        let task = GenerationTask::spawn(Arc::new(Panicking), Vec::new()).unwrap();
        assert!(matches!(
            task.wait(),
            Err(JobError::Transfer(TransferError::Disconnected))
        ));
    }
}
