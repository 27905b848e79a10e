//! Off-thread ingestion with message passing and cooperative cancellation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use kgv_common::{CancelToken, KgvError, KgvResult, ViewConfig};
use tracing::{debug, info};

use crate::format::SourceFormat;
use crate::pipeline::{IngestOutput, IngestStage, ingest_with_progress};

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Everything a worker needs; owned so the thread shares nothing.
#[derive(Clone, Debug)]
pub struct IngestRequest {
    pub text: String,
    pub format: SourceFormat,
    pub config: ViewConfig,
}

/// Messages from a worker to its handle.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Advisory only.
    Progress(IngestStage),
    Done(IngestOutput),
    Error(KgvError),
}

pub struct IngestWorker;

impl IngestWorker {
    /// Start ingesting on a dedicated named thread.
    pub fn spawn(request: IngestRequest) -> KgvResult<IngestHandle> {
        let worker_id = NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel();
        let cancel = CancelToken::new();
        let token = cancel.clone();

        thread::Builder::new()
            .name(format!("kgv-ingest-{worker_id}"))
            .spawn(move || {
                let started = Instant::now();
                let IngestRequest {
                    text,
                    format,
                    config,
                } = request;
                let result = ingest_with_progress(&text, format, &config, &token, &mut |stage| {
                    // The handle may already be gone; progress is advisory.
                    let _ = tx.send(WorkerMessage::Progress(stage));
                });
                if token.is_cancelled() {
                    debug!(worker_id, "ingest cancelled");
                    return;
                }
                let message = match result {
                    Ok(output) => {
                        info!(
                            worker_id,
                            %format,
                            nodes = output.graph.node_count(),
                            edges = output.graph.edge_count(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "ingest finished"
                        );
                        WorkerMessage::Done(output)
                    }
                    Err(e) => {
                        debug!(worker_id, error = %e, "ingest failed");
                        WorkerMessage::Error(e)
                    }
                };
                let _ = tx.send(message);
            })?;

        Ok(IngestHandle {
            rx,
            cancel,
            finished: false,
        })
    }
}

/// Consumer side of a running ingestion.
///
/// A cancelled handle never yields a result. Dropping the handle cancels
/// the worker.
pub struct IngestHandle {
    rx: Receiver<WorkerMessage>,
    cancel: CancelToken,
    finished: bool,
}

impl IngestHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once `Done` or `Error` has been received.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Next message without blocking.
    pub fn try_recv(&mut self) -> Option<WorkerMessage> {
        if self.is_cancelled() || self.finished {
            return None;
        }
        match self.rx.try_recv() {
            Ok(message) => Some(self.observe(message)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                Some(WorkerMessage::Error(KgvError::Import(
                    "ingest worker exited without a result".into(),
                )))
            }
        }
    }

    /// Next message, blocking until one arrives.
    pub fn recv(&mut self) -> Option<WorkerMessage> {
        if self.is_cancelled() || self.finished {
            return None;
        }
        match self.rx.recv() {
            Ok(message) => Some(self.observe(message)),
            Err(_) => {
                self.finished = true;
                Some(WorkerMessage::Error(KgvError::Import(
                    "ingest worker exited without a result".into(),
                )))
            }
        }
    }

    /// Block until the worker finishes, skipping progress messages.
    pub fn wait(mut self) -> KgvResult<IngestOutput> {
        loop {
            match self.recv() {
                Some(WorkerMessage::Progress(_)) => continue,
                Some(WorkerMessage::Done(output)) => return Ok(output),
                Some(WorkerMessage::Error(e)) => return Err(e),
                None => return Err(KgvError::Cancelled),
            }
        }
    }

    fn observe(&mut self, message: WorkerMessage) -> WorkerMessage {
        if matches!(message, WorkerMessage::Done(_) | WorkerMessage::Error(_)) {
            self.finished = true;
        }
        message
    }
}

impl Drop for IngestHandle {
    fn drop(&mut self) {
        if !self.finished {
            self.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, format: SourceFormat) -> IngestRequest {
        IngestRequest {
            text: text.to_string(),
            format,
            config: ViewConfig::default(),
        }
    }

    #[test]
    fn worker_ingests_json() {
        let handle = IngestWorker::spawn(request(
            r#"{"nodes":[{"id":1},{"id":2}],"edges":[{"from":1,"to":2}]}"#,
            SourceFormat::Json,
        ))
        .unwrap();
        let output = handle.wait().unwrap();
        assert_eq!(output.graph.node_count(), 2);
        assert_eq!(output.graph.edge_count(), 1);
    }

    #[test]
    fn worker_reports_parse_errors() {
        let handle = IngestWorker::spawn(request("@prefix broken", SourceFormat::TURTLE)).unwrap();
        assert!(matches!(handle.wait(), Err(KgvError::Parse(_))));
    }

    #[test]
    fn cancelled_handle_never_yields() {
        let mut handle = IngestWorker::spawn(request("{}", SourceFormat::Json)).unwrap();
        handle.cancel();
        assert!(handle.try_recv().is_none());
        assert!(handle.recv().is_none());
        assert!(matches!(handle.wait(), Err(KgvError::Cancelled)));
    }

    #[test]
    fn messages_end_with_done() {
        let mut handle = IngestWorker::spawn(request(
            "<http://ex.org/a> <http://ex.org/p> \"x\" .",
            SourceFormat::NTRIPLES,
        ))
        .unwrap();
        let mut saw_progress = false;
        loop {
            match handle.recv() {
                Some(WorkerMessage::Progress(_)) => saw_progress = true,
                Some(WorkerMessage::Done(out)) => {
                    assert_eq!(out.graph.node_count(), 2);
                    break;
                }
                other => panic!("unexpected message: {other:?}"),
            }
        }
        assert!(saw_progress);
        assert!(handle.is_finished());
        assert!(handle.try_recv().is_none());
    }
}
