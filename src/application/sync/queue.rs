//! Resource sync queue
//!
//! Bounded worker pool pushing code updates to independent resources.
//! One resource's failure never cancels its siblings; a session-level
//! cancellation stops dispatch of not-yet-started tasks while letting
//! in-flight ones finish.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::ports::{StackProvider, SyncEvent, SyncEventSink};
use crate::domain::value_objects::ChangedResource;

/// Per-resource outcome of one queue run
#[derive(Debug)]
pub struct QueueReport {
    pub synced: Vec<ChangedResource>,
    pub failed: Vec<(ChangedResource, String)>,
    pub not_attempted: Vec<ChangedResource>,
}

impl QueueReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.not_attempted.is_empty()
    }
}

/// Bounded-concurrency dispatcher for code updates
pub struct ResourceSyncQueue<'a, P: StackProvider> {
    provider: &'a P,
    workers: usize,
    events: Arc<dyn SyncEventSink>,
}

impl<'a, P: StackProvider> ResourceSyncQueue<'a, P> {
    pub fn new(provider: &'a P, workers: usize, events: Arc<dyn SyncEventSink>) -> Self {
        Self {
            provider,
            workers: workers.max(1),
            events,
        }
    }

    /// Dispatch one code-update task per resource across the worker pool
    /// and wait for the pool to drain.
    pub fn run(&self, changed: Vec<ChangedResource>, cancel: &AtomicBool) -> QueueReport {
        let workers = self.workers.min(changed.len()).max(1);
        let jobs = Mutex::new(VecDeque::from(changed));
        let synced = Mutex::new(Vec::new());
        let failed = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    if cancel.load(Ordering::SeqCst) {
                        break;
                    }
                    let job = lock(&jobs).pop_front();
                    let Some(job) = job else { break };

                    match self.provider.update_resource_code(&job) {
                        Ok(()) => {
                            self.events.emit(SyncEvent::ResourceSynced {
                                resource: job.qualified_id.clone(),
                            });
                            lock(&synced).push(job);
                        }
                        Err(err) => {
                            self.events.emit(SyncEvent::ResourceSyncFailed {
                                resource: job.qualified_id.clone(),
                                message: err.message.clone(),
                            });
                            lock(&failed).push((job, err.message));
                        }
                    }
                });
            }
        });

        let not_attempted: Vec<ChangedResource> = jobs
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .collect();
        for resource in &not_attempted {
            self.events.emit(SyncEvent::ResourceSyncSkipped {
                resource: resource.qualified_id.clone(),
            });
        }

        QueueReport {
            synced: synced.into_inner().unwrap_or_else(PoisonError::into_inner),
            failed: failed.into_inner().unwrap_or_else(PoisonError::into_inner),
            not_attempted,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
