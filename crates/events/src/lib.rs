//! Change notifications for the record store (`subscribeToChanges`).
//!
//! Writes to the store publish a [`ChangeNotice`]; views that list a table
//! subscribe to it and re-fetch when something changes.

pub mod bus;
pub mod change;
pub mod in_memory_bus;

pub use bus::{ChangeBus, Subscription};
pub use change::{ChangeKind, ChangeNotice, TableScoped};
pub use in_memory_bus::{InMemoryBusError, InMemoryChangeBus};
