//! Shared workflow machinery
//!
//! A workflow never awaits the gateway while holding itself borrowed. Starting
//! an operation hands back a [`Pending`] call stamped with a [`Ticket`]; the
//! driver runs it wherever it likes and feeds the resulting [`Completion`]
//! back. The workflow applies a completion only if its ticket still belongs
//! to the current activation, so responses that arrive after the view went
//! away, or after it was re-activated, are dropped.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use crate::gateway::TransportError;

/// Core workflow trait shared by the list, detail and submission workflows
pub trait Workflow {
    /// The phase type for this workflow
    type Phase: Debug;

    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Get the current phase of the workflow
    fn phase(&self) -> &Self::Phase;

    /// Whether the owning view is currently active
    fn is_active(&self) -> bool;

    /// Detach from the view; in-flight completions will be discarded
    fn deactivate(&mut self);
}

/// Identifies the activation a gateway call was issued under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// Tracks which activation of a view is current
#[derive(Debug, Default)]
pub(crate) struct Activation {
    generation: u64,
    active: bool,
}

impl Activation {
    /// Begin a new activation, invalidating every earlier ticket
    pub(crate) fn start(&mut self) -> Ticket {
        self.generation += 1;
        self.active = true;
        Ticket {
            generation: self.generation,
        }
    }

    /// End the current activation
    pub(crate) fn end(&mut self) {
        self.generation += 1;
        self.active = false;
    }

    /// Ticket for the current activation, if any
    pub(crate) fn current(&self) -> Option<Ticket> {
        self.active.then_some(Ticket {
            generation: self.generation,
        })
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a completion stamped with `ticket` may still be applied
    pub(crate) fn accepts(&self, ticket: Ticket) -> bool {
        self.active && ticket.generation == self.generation
    }
}

/// Whether a completion changed the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The result was applied to the current state
    Applied,
    /// The result belonged to a stale activation and was dropped
    Discarded,
}

impl Applied {
    /// Check if the completion was applied
    pub fn is_applied(&self) -> bool {
        matches!(self, Applied::Applied)
    }
}

type Call<T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send>>;

/// A gateway call issued by a workflow, waiting to be run
#[must_use = "a pending call does nothing until it is run"]
pub struct Pending<T> {
    ticket: Ticket,
    call: Call<T>,
}

impl<T> Pending<T> {
    pub(crate) fn new<F>(ticket: Ticket, call: F) -> Self
    where
        F: Future<Output = Result<T, TransportError>> + Send + 'static,
    {
        Self {
            ticket,
            call: Box::pin(call),
        }
    }

    /// The activation this call belongs to
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Run the call to completion
    pub async fn run(self) -> Completion<T> {
        Completion {
            ticket: self.ticket,
            result: self.call.await,
        }
    }
}

impl<T> std::fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// The outcome of a [`Pending`] call, to be handed back to its workflow
#[derive(Debug)]
pub struct Completion<T> {
    ticket: Ticket,
    result: Result<T, TransportError>,
}

impl<T> Completion<T> {
    /// The activation this result belongs to
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Check if the call failed
    pub fn is_err(&self) -> bool {
        self.result.is_err()
    }

    pub(crate) fn into_parts(self) -> (Ticket, Result<T, TransportError>) {
        (self.ticket, self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Operation;

    #[test]
    fn test_new_activation_invalidates_old_tickets() {
        let mut activation = Activation::default();
        assert!(!activation.is_active());
        assert!(activation.current().is_none());

        let first = activation.start();
        assert!(activation.accepts(first));

        let second = activation.start();
        assert!(!activation.accepts(first));
        assert!(activation.accepts(second));
        assert_eq!(activation.current(), Some(second));
    }

    #[test]
    fn test_ending_activation_rejects_everything() {
        let mut activation = Activation::default();
        let ticket = activation.start();
        activation.end();

        assert!(!activation.is_active());
        assert!(!activation.accepts(ticket));
    }

    #[tokio::test]
    async fn test_pending_run_carries_ticket() {
        let mut activation = Activation::default();
        let ticket = activation.start();

        let pending = Pending::new(ticket, async { Ok::<_, TransportError>(7) });
        assert_eq!(pending.ticket(), ticket);

        let completion = pending.run().await;
        assert_eq!(completion.ticket(), ticket);
        assert!(!completion.is_err());
        assert_eq!(completion.into_parts().1.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_failed_completion() {
        let mut activation = Activation::default();
        let ticket = activation.start();

        let pending: Pending<u32> = Pending::new(ticket, async {
            Err(TransportError::new(Operation::List, "connection refused"))
        });
        assert!(pending.run().await.is_err());
    }

    #[test]
    fn test_applied() {
        assert!(Applied::Applied.is_applied());
        assert!(!Applied::Discarded.is_applied());
    }
}
