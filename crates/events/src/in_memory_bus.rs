//! In-memory change bus for tests/dev.

use std::sync::{Mutex, mpsc};

use crate::bus::{ChangeBus, Subscription};
use crate::change::TableScoped;

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

#[derive(Debug)]
struct Subscriber<M> {
    table: Option<String>,
    sender: mpsc::Sender<M>,
}

/// In-memory fan-out bus.
///
/// - No IO / no async
/// - Dropped subscriptions are pruned on the next publish
#[derive(Debug)]
pub struct InMemoryChangeBus<M> {
    subscribers: Mutex<Vec<Subscriber<M>>>,
}

impl<M> InMemoryChangeBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, table: Option<String>) -> Subscription<M> {
        let (sender, rx) = mpsc::channel();

        // A poisoned lock still yields a subscription; it just never fires.
        match self.subscribers.lock() {
            Ok(mut subs) => subs.push(Subscriber { table, sender }),
            Err(_) => tracing::warn!("change bus lock poisoned; subscription will be idle"),
        }

        Subscription::new(rx)
    }
}

impl<M> Default for InMemoryChangeBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> ChangeBus<M> for InMemoryChangeBus<M>
where
    M: TableScoped + Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        subs.retain(|sub| match &sub.table {
            Some(table) if table != message.table() => true,
            _ => sub.sender.send(message.clone()).is_ok(),
        });

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        self.register(None)
    }

    fn subscribe_table(&self, table: &str) -> Subscription<M> {
        self.register(Some(table.to_string()))
    }
}
