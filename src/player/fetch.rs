//! Catalog calls off the UI thread.
//!
//! Every request runs on its own short-lived worker thread and reports back
//! through a channel; the controller applies outcomes in completion order.
//! There is no cancellation. Each request carries a `RequestId` so the
//! controller can recognize and drop superseded results.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::catalog::{Catalog, CatalogError, Track};

/// Monotonic tag for catalog requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

#[derive(Debug)]
pub enum FetchOutcome {
    Search {
        request: RequestId,
        query: String,
        result: Result<Vec<Track>, CatalogError>,
    },
    Resolve {
        request: RequestId,
        index: usize,
        track: Track,
        result: Result<String, CatalogError>,
    },
}

pub struct Fetcher {
    catalog: Arc<dyn Catalog>,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    next_id: u64,
    in_flight: usize,
}

impl Fetcher {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            catalog,
            tx,
            rx,
            next_id: 0,
            in_flight: 0,
        }
    }

    fn next_request(&mut self) -> RequestId {
        self.next_id += 1;
        self.in_flight += 1;
        RequestId(self.next_id)
    }

    pub fn search(&mut self, query: String) -> RequestId {
        let request = self.next_request();
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = catalog.search(&query);
            let _ = tx.send(FetchOutcome::Search {
                request,
                query,
                result,
            });
        });
        request
    }

    pub fn resolve(&mut self, index: usize, track: Track) -> RequestId {
        let request = self.next_request();
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = catalog.resolve(&track.id);
            let _ = tx.send(FetchOutcome::Resolve {
                request,
                index,
                track,
                result,
            });
        });
        request
    }

    /// Next completed outcome, if one is waiting.
    pub fn try_next(&mut self) -> Option<FetchOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Block up to `timeout` for the next completed outcome.
    #[cfg(test)]
    pub fn wait_next(&mut self, timeout: std::time::Duration) -> Option<FetchOutcome> {
        let outcome = self.rx.recv_timeout(timeout).ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
