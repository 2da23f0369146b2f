//! Debounced scheduling of routing passes.
//!
//! Drag events arrive per pointer move; routing every one of them is wasted
//! work. `DebouncedEdgeRouting` owns a worker thread holding at most one
//! pending snapshot: each `schedule` call replaces the pending snapshot and
//! resets the delay timer, so only the last snapshot before the timer fires
//! is ever solved. Every scheduled snapshot carries a generation token, and
//! a solve whose token is no longer the newest is dropped instead of being
//! delivered, which keeps a slow in-flight solve from overwriting the
//! result of a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::{LayoutError, Result};
use crate::model::{CanvasNode, RouteMap, WorkspaceEdge};
use crate::routing::EdgeRouter;

enum Command {
    Schedule {
        token: u64,
        nodes: Vec<CanvasNode>,
        edges: Vec<WorkspaceEdge>,
    },
    Cancel,
}

struct Pending {
    token: u64,
    nodes: Vec<CanvasNode>,
    edges: Vec<WorkspaceEdge>,
    deadline: Instant,
}

/// Handle to the debounce worker. Dropping it shuts the worker down after
/// any in-flight solve finishes.
pub struct DebouncedEdgeRouting {
    sender: Option<mpsc::Sender<Command>>,
    generation: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

/// Spawn a debounce worker around `router`. `on_complete` runs on the
/// worker thread with the routes of each non-stale, non-failed pass.
pub fn create_debounced_edge_routing<F>(
    router: EdgeRouter,
    on_complete: F,
    delay: Duration,
) -> DebouncedEdgeRouting
where
    F: FnMut(RouteMap) + Send + 'static,
{
    let (sender, receiver) = mpsc::channel::<Command>();
    let generation = Arc::new(AtomicU64::new(0));
    let worker_generation = Arc::clone(&generation);
    let worker = thread::spawn(move || {
        run_worker(router, receiver, worker_generation, delay, on_complete);
    });
    DebouncedEdgeRouting {
        sender: Some(sender),
        generation,
        worker: Some(worker),
    }
}

impl DebouncedEdgeRouting {
    /// Replace any pending snapshot with this one and restart the delay
    /// timer.
    pub fn schedule(&self, nodes: Vec<CanvasNode>, edges: Vec<WorkspaceEdge>) -> Result<()> {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.send(Command::Schedule {
            token,
            nodes,
            edges,
        })
    }

    /// Drop the pending snapshot without running `on_complete`. Also
    /// invalidates the token of any solve already in flight, so its result
    /// is discarded on arrival.
    pub fn cancel(&self) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.send(Command::Cancel)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.sender
            .as_ref()
            .ok_or(LayoutError::WorkerDisconnected)?
            .send(command)
            .map_err(|_| LayoutError::WorkerDisconnected)
    }
}

impl Drop for DebouncedEdgeRouting {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker<F>(
    router: EdgeRouter,
    receiver: mpsc::Receiver<Command>,
    generation: Arc<AtomicU64>,
    delay: Duration,
    mut on_complete: F,
) where
    F: FnMut(RouteMap) + Send + 'static,
{
    let mut pending: Option<Pending> = None;
    loop {
        let command = if let Some(p) = pending.take() {
            let now = Instant::now();
            if now >= p.deadline {
                solve_pass(&router, p, &generation, &mut on_complete);
                continue;
            }
            let wait = p.deadline - now;
            pending = Some(p);
            match receiver.recv_timeout(wait) {
                Ok(command) => command,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        } else {
            match receiver.recv() {
                Ok(command) => command,
                Err(_) => return,
            }
        };
        match command {
            Command::Schedule {
                token,
                nodes,
                edges,
            } => {
                pending = Some(Pending {
                    token,
                    nodes,
                    edges,
                    deadline: Instant::now() + delay,
                });
            }
            Command::Cancel => pending = None,
        }
    }
}

fn solve_pass<F>(
    router: &EdgeRouter,
    pending: Pending,
    generation: &AtomicU64,
    on_complete: &mut F,
) where
    F: FnMut(RouteMap),
{
    // Superseded before the solve even started.
    if generation.load(Ordering::SeqCst) != pending.token {
        return;
    }
    match router.compute_edge_routes(&pending.nodes, &pending.edges) {
        Ok(routes) => {
            // A newer schedule or a cancel arrived while solving.
            if generation.load(Ordering::SeqCst) == pending.token {
                on_complete(routes);
            }
        }
        Err(err) => {
            warn!(error = %err, "edge routing pass failed, keeping previous routes");
        }
    }
}
