//! Record categories and date-partitioned index naming.
//!
//! Each category identifies both a monitoring endpoint and a family of
//! destination indices. Index names carry a UTC date suffix so that
//! writes within the same UTC day land in the same index:
//! `natsvarz-2024.01.01`, `natssubsz-2024.01.01`, `natsroutez-2024.01.01`.

use chrono::{NaiveDate, Utc};

/// One of the three monitoring record categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Connection/server stats (`/varz`) - the correlation anchor.
    Varz,
    /// Subscription stats (`/subsz`).
    Subsz,
    /// Route stats (`/routez`), one record per route.
    Routez,
}

impl Category {
    /// All categories, in the order they are fetched and written.
    pub const ALL: [Category; 3] = [Category::Varz, Category::Subsz, Category::Routez];

    /// Category label, used in index names and as the document type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Varz => "varz",
            Category::Subsz => "subsz",
            Category::Routez => "routez",
        }
    }

    /// Monitoring endpoint path for this category.
    pub fn path(&self) -> &'static str {
        match self {
            Category::Varz => "/varz",
            Category::Subsz => "/subsz",
            Category::Routez => "/routez",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index name for a category on a given date.
pub fn index_name(category: Category, date: NaiveDate) -> String {
    format!("nats{}-{}", category.as_str(), date.format("%Y.%m.%d"))
}

/// Index name for a category at the current UTC date.
///
/// Computed fresh per write, never cached: a write that crosses a UTC
/// day boundary relative to cycle start lands in the write-time index.
pub fn index_name_now(category: Category) -> String {
    index_name(category, Utc::now().date_naive())
}
