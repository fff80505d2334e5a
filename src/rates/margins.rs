//! Client category margins over the key rate

use serde::{Deserialize, Serialize};

use crate::loan::ClientCategory;

/// Percentage points added to the key rate for each client category
///
/// Every category must have a field here; the amortization loop only ever
/// sees the resulting effective rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginTable {
    pub government: f64,
    pub business: f64,
    pub individual: f64,
}

impl MarginTable {
    /// Margin in percentage points for a category
    pub fn margin(&self, category: ClientCategory) -> f64 {
        match category {
            ClientCategory::Government => self.government,
            ClientCategory::Business => self.business,
            ClientCategory::Individual => self.individual,
        }
    }

    /// Iterate (category, margin) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (ClientCategory, f64)> + '_ {
        ClientCategory::ALL.into_iter().map(move |c| (c, self.margin(c)))
    }
}

impl Default for MarginTable {
    fn default() -> Self {
        Self {
            government: 0.0,
            business: 1.0,
            individual: 2.0,
        }
    }
}
