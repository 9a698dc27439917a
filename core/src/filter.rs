//! Filter predicate builder.
//!
//! A `FilterSelection` is three independent value sets, one per
//! categorical dimension. An empty set means "no restriction" on that
//! dimension. The predicate is the AND of the membership tests for every
//! non-empty set; a null category never matches.
//!
//! The same predicate has two renderings:
//!   - `matches()`  evaluates it directly against a loaded record.
//!   - `to_sql()`   renders a parameterised WHERE clause. Values are bound,
//!                  never spliced into SQL text.

use crate::record::{AccountRecord, Dimension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub risk_tolerance: BTreeSet<String>,
    #[serde(default)]
    pub region: BTreeSet<String>,
    #[serde(default)]
    pub account_type: BTreeSet<String>,
}

impl FilterSelection {
    /// Selection with no restrictions: accepts every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn values(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::RiskTolerance => &self.risk_tolerance,
            Dimension::Region => &self.region,
            Dimension::AccountType => &self.account_type,
        }
    }

    fn values_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::RiskTolerance => &mut self.risk_tolerance,
            Dimension::Region => &mut self.region,
            Dimension::AccountType => &mut self.account_type,
        }
    }

    /// Replace the selected values for one dimension.
    pub fn select<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.values_mut(dimension) = values.into_iter().map(Into::into).collect();
    }

    /// Builder form of `select`.
    pub fn with<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select(dimension, values);
        self
    }

    /// Reset every dimension to unrestricted.
    pub fn clear(&mut self) {
        for dim in Dimension::ALL {
            self.values_mut(dim).clear();
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.values(*d).is_empty())
    }

    /// In-memory predicate.
    pub fn matches(&self, record: &AccountRecord) -> bool {
        Dimension::ALL.iter().all(|dim| {
            let selected = self.values(*dim);
            if selected.is_empty() {
                return true;
            }
            record
                .category(*dim)
                .is_some_and(|value| selected.contains(value))
        })
    }

    /// Parameterised SQL rendering of the same predicate.
    /// Placeholders are numbered from `?1` in dimension order.
    pub fn to_sql(&self) -> SqlFilter {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        for dim in Dimension::ALL {
            let selected = self.values(dim);
            if selected.is_empty() {
                continue;
            }
            let placeholders: Vec<String> = selected
                .iter()
                .map(|value| {
                    params.push(value.clone());
                    format!("?{}", params.len())
                })
                .collect();
            clauses.push(format!("{} IN ({})", dim.column(), placeholders.join(", ")));
        }

        let clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        SqlFilter { clause, params }
    }
}

/// A WHERE clause plus the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFilter {
    /// Empty when the selection is unrestricted.
    pub clause: String,
    pub params: Vec<String>,
}

/// Known values per dimension, loaded once at startup and immutable after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDomain {
    pub risk_tolerance: Vec<String>,
    pub region: Vec<String>,
    pub account_type: Vec<String>,
}

impl FilterDomain {
    pub fn values(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::RiskTolerance => &self.risk_tolerance,
            Dimension::Region => &self.region,
            Dimension::AccountType => &self.account_type,
        }
    }

    pub fn contains(&self, dimension: Dimension, value: &str) -> bool {
        self.values(dimension).iter().any(|v| v == value)
    }

    /// The startup selection: every known value in every dimension.
    pub fn full_selection(&self) -> FilterSelection {
        let mut selection = FilterSelection::default();
        for dim in Dimension::ALL {
            selection.select(dim, self.values(dim).iter().cloned());
        }
        selection
    }

    /// Selected values that are not in the domain. They are kept in the
    /// predicate and simply match nothing.
    pub fn unknown_values(&self, selection: &FilterSelection) -> Vec<(Dimension, String)> {
        Dimension::ALL
            .iter()
            .flat_map(|dim| {
                selection
                    .values(*dim)
                    .iter()
                    .filter(move |v| !self.contains(*dim, v))
                    .map(move |v| (*dim, v.clone()))
            })
            .collect()
    }
}
