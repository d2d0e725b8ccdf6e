//! Live price table plus the sequence guard that keeps late responses from
//! overwriting newer ones.

use std::collections::HashMap;

use rendercalc_core::LiveProduct;
use serde::{Deserialize, Serialize};

/// Live products keyed by product handle.
pub type LivePriceTable = HashMap<String, LiveProduct>;

/// Sequence number handed out with each price request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns the live price table for one session.
///
/// Every request takes a [`Ticket`] from [`PriceFeed::issue`]. A response is
/// merged only if its ticket is newer than the last one applied.
#[derive(Debug, Clone, Default)]
pub struct PriceFeed {
    table: LivePriceTable,
    issued: u64,
    applied: u64,
}

impl PriceFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already populated table, e.g. one fetched up front.
    #[must_use]
    pub fn with_table(table: LivePriceTable) -> Self {
        Self {
            table,
            issued: 0,
            applied: 0,
        }
    }

    #[must_use]
    pub fn table(&self) -> &LivePriceTable {
        &self.table
    }

    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// `true` while a request newer than the last applied one is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.issued > self.applied
    }

    /// Merge `products` into the table unless `ticket` is stale.
    ///
    /// Returns `true` if the response was applied.
    pub fn apply(&mut self, ticket: Ticket, products: LivePriceTable) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(
                %ticket,
                last_applied = self.applied,
                "discarding stale price response"
            );
            return false;
        }
        self.applied = ticket.0;
        self.table.extend(products);
        true
    }
}
