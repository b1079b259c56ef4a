//! Cancellable asynchronous content loads.
//!
//! Each content slice (categories, brands, media) owns a generation counter.
//! Starting a new request or cancelling bumps the slice generation; results
//! that come back with an older generation are dropped on arrival. After
//! `shutdown` nothing is delivered at all.
//!
//! Store calls are blocking (SQLite) and run on tokio's blocking pool.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, trace, warn};

use crate::error::ContentError;
use crate::models::{Brand, Category, CategoryId, ContentStore, MediaItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Categories,
    Brands(CategoryId),
    Media,
}

impl LoadRequest {
    pub fn slice(&self) -> Slice {
        match self {
            Self::Categories => Slice::Categories,
            Self::Brands(_) => Slice::Brands,
            Self::Media => Slice::Media,
        }
    }
}

/// Independent pieces of client state, each written by one kind of load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Categories,
    Brands,
    Media,
}

impl Slice {
    const ALL: [Slice; 3] = [Slice::Categories, Slice::Brands, Slice::Media];

    fn index(self) -> usize {
        match self {
            Self::Categories => 0,
            Self::Brands => 1,
            Self::Media => 2,
        }
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    Categories(Result<Vec<Category>, ContentError>),
    Brands {
        category_id: CategoryId,
        result: Result<Vec<Brand>, ContentError>,
    },
    Media(Result<Vec<MediaItem>, ContentError>),
}

impl LoadOutcome {
    pub fn is_err(&self) -> bool {
        match self {
            Self::Categories(r) => r.is_err(),
            Self::Brands { result, .. } => result.is_err(),
            Self::Media(r) => r.is_err(),
        }
    }
}

#[derive(Debug)]
struct LoadEvent {
    slice: Slice,
    generation: u64,
    outcome: LoadOutcome,
}

/// Issues store queries in the background and hands back only current results.
pub struct ContentLoader<S: ContentStore + 'static> {
    store: Arc<Mutex<S>>,
    tx: mpsc::UnboundedSender<LoadEvent>,
    rx: mpsc::UnboundedReceiver<LoadEvent>,
    generations: [u64; 3],
    pending: [Option<u64>; 3],
    closed: bool,
}

impl<S: ContentStore + 'static> ContentLoader<S> {
    pub fn new(store: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store: Arc::new(Mutex::new(store)),
            tx,
            rx,
            generations: [0; 3],
            pending: [None; 3],
            closed: false,
        }
    }

    pub fn is_loading(&self, slice: Slice) -> bool {
        self.pending[slice.index()].is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Starts a load, superseding any in-flight load of the same slice.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, request: LoadRequest) -> u64 {
        let slice = request.slice();
        let generation = self.bump(slice);
        if self.closed {
            return generation;
        }
        self.pending[slice.index()] = Some(generation);

        debug!(?request, generation, "Starting content load");

        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let query = request.clone();
            let outcome = match task::spawn_blocking(move || run_query(&*store.lock(), &query)).await {
                Ok(outcome) => outcome,
                Err(e) => failed_outcome(&request, ContentError::Task(e.to_string())),
            };
            if tx
                .send(LoadEvent {
                    slice,
                    generation,
                    outcome,
                })
                .is_err()
            {
                trace!(?slice, generation, "Loader gone, dropping result");
            }
        });

        generation
    }

    /// Forgets any in-flight load for `slice`; its result will be discarded.
    pub fn cancel(&mut self, slice: Slice) {
        if self.pending[slice.index()].take().is_some() {
            debug!(?slice, "Cancelled content load");
        }
        self.bump(slice);
    }

    /// Tears the loader down; in-flight results are discarded.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        for slice in Slice::ALL {
            self.cancel(slice);
        }
        self.closed = true;
        self.rx.close();
        debug!("Content loader shut down");
    }

    /// Waits for the next current result.
    ///
    /// Returns `None` once the loader is shut down. Cancel safe.
    pub async fn next(&mut self) -> Option<LoadOutcome> {
        loop {
            if self.closed {
                return None;
            }
            let event = self.rx.recv().await?;
            if let Some(outcome) = self.accept(event) {
                return Some(outcome);
            }
        }
    }

    fn accept(&mut self, event: LoadEvent) -> Option<LoadOutcome> {
        let idx = event.slice.index();
        if self.closed || self.pending[idx] != Some(event.generation) {
            trace!(slice = ?event.slice, generation = event.generation, "Discarding stale load");
            return None;
        }
        self.pending[idx] = None;
        if event.outcome.is_err() {
            warn!(slice = ?event.slice, "Content load failed");
        }
        Some(event.outcome)
    }

    fn bump(&mut self, slice: Slice) -> u64 {
        let generation = &mut self.generations[slice.index()];
        *generation = generation.wrapping_add(1);
        *generation
    }
}

impl<S: ContentStore + 'static> Drop for ContentLoader<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_query<S: ContentStore + ?Sized>(store: &S, request: &LoadRequest) -> LoadOutcome {
    match request {
        LoadRequest::Categories => LoadOutcome::Categories(store.list_categories()),
        LoadRequest::Brands(category_id) => LoadOutcome::Brands {
            category_id: *category_id,
            result: store.list_brands(*category_id),
        },
        LoadRequest::Media => LoadOutcome::Media(store.list_media()),
    }
}

fn failed_outcome(request: &LoadRequest, error: ContentError) -> LoadOutcome {
    match request {
        LoadRequest::Categories => LoadOutcome::Categories(Err(error)),
        LoadRequest::Brands(category_id) => LoadOutcome::Brands {
            category_id: *category_id,
            result: Err(error),
        },
        LoadRequest::Media => LoadOutcome::Media(Err(error)),
    }
}
