//! Stock filtering and grouping into pivot rows

use crate::derive::{Category, DerivedRow};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Separator between short codes in a pivot cell
pub const CODE_SEPARATOR: &str = ", ";

/// One report line: all in-stock codes of a category at a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow {
    /// Distribution network; absent in single-network reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub address: String,
    pub category: Category,
    /// Short codes in source row order, duplicates kept
    pub codes: String,
}

impl AggregateRow {
    /// Report order: network, then address
    pub fn cmp_report_order(&self, other: &Self) -> Ordering {
        self.network
            .cmp(&other.network)
            .then_with(|| self.address.cmp(&other.address))
    }
}

/// Keep rows with strictly positive stock and group them by
/// (address, category), tagging every group with `network`.
///
/// Groups come out in ascending (address, category) order. Rows without an
/// address have no group and are dropped.
pub fn aggregate(rows: &[DerivedRow], network: Option<&str>) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(&str, Category), Vec<&str>> = BTreeMap::new();

    for row in rows.iter().filter(|row| row.stock > 0.0) {
        let Some(address) = row.address.as_deref() else {
            debug!(code = %row.short_code, "skipping in-stock row without a store address");
            continue;
        };
        groups
            .entry((address, row.category))
            .or_default()
            .push(row.short_code.as_str());
    }

    groups
        .into_iter()
        .map(|((address, category), codes)| AggregateRow {
            network: network.map(str::to_string),
            address: address.to_string(),
            category,
            codes: codes.join(CODE_SEPARATOR),
        })
        .collect()
}
