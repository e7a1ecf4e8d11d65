//! Last-query-wins dispatch.
//!
//! A [`LatestQuery`] keeps at most one lookup in flight. Submitting a new query
//! cancels the previous one, and every submission produces exactly one
//! [`Delivery`] on the receiver handed out by [`LatestQuery::new`].

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{client::ConditionsSource, error::FetchError, model::WeatherReport};

/// Identifies one submission. Later submissions have larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub enum Outcome {
    Completed(Result<WeatherReport, FetchError>),
    /// Cancelled by a newer submission or by dropping the session.
    Superseded,
}

#[derive(Debug)]
pub struct Delivery {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

pub struct LatestQuery<S: ?Sized> {
    source: Arc<S>,
    tx: mpsc::UnboundedSender<Delivery>,
    last_ticket: u64,
    in_flight: Option<CancellationToken>,
}

impl<S> LatestQuery<S>
where
    S: ConditionsSource + ?Sized + 'static,
{
    pub fn new(source: Arc<S>) -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self { source, tx, last_ticket: 0, in_flight: None };
        (session, rx)
    }

    /// Start a lookup for `query`, superseding whatever is still running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&mut self, query: impl Into<String>) -> Ticket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let query = query.into();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => Outcome::Superseded,
                result = source.fetch_current(&query) => Outcome::Completed(result),
            };

            if matches!(outcome, Outcome::Superseded) {
                debug!(ticket = ticket.0, "lookup superseded");
            }

            // A closed receiver means nobody is waiting for this anymore.
            let _ = tx.send(Delivery { ticket, outcome });
        });

        ticket
    }

    /// Stop accepting queries but let the in-flight lookup finish. The receiver
    /// yields `None` once it has been delivered.
    pub fn close(mut self) {
        self.in_flight = None;
    }
}

impl<S: ?Sized> Drop for LatestQuery<S> {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
