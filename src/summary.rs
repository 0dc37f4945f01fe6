//! Filterable overview of a complaint corpus.
//!
//! Computes the headline metrics and breakdowns for a filtered set of
//! records. Counts are sorted by count descending, then by name.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::complaints::{MetadataField, Record};

const TOP_COMPANIES: usize = 10;
const TOP_STATES: usize = 15;

/// Record filter. Empty lists and unset bounds do not filter.
#[derive(Debug, Clone, Default)]
pub struct SummaryFilter {
    pub companies: Vec<String>,
    pub products: Vec<String>,
    /// Inclusive lower bound on `date_received`
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `date_received`
    pub to: Option<NaiveDate>,
}

impl SummaryFilter {
    pub fn matches(&self, record: &Record) -> bool {
        let meta = &record.metadata;

        if !self.companies.is_empty()
            && !meta
                .company
                .as_ref()
                .is_some_and(|c| self.companies.contains(c))
        {
            return false;
        }

        if !self.products.is_empty()
            && !meta
                .product
                .as_ref()
                .is_some_and(|p| self.products.contains(p))
        {
            return false;
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(date) = meta.date_received else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) || self.to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_complaints: usize,
    pub unique_companies: usize,
    pub product_types: usize,
    pub with_narratives: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub name: String,
    pub count: usize,
}

/// Complaints received in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub overview: Overview,
    pub top_companies: Vec<Count>,
    pub products: Vec<Count>,
    pub top_states: Vec<Count>,
    pub monthly_volume: Vec<MonthCount>,
}

impl Summary {
    pub fn build(records: &[Record], filter: &SummaryFilter) -> Self {
        let filtered = filter.apply(records);

        Self {
            overview: overview(&filtered),
            top_companies: top_counts(&filtered, MetadataField::Company, TOP_COMPANIES),
            products: value_counts(&filtered, MetadataField::Product),
            top_states: top_counts(&filtered, MetadataField::State, TOP_STATES),
            monthly_volume: monthly_volume(&filtered),
        }
    }
}

fn distinct(records: &[&Record], field: MetadataField) -> usize {
    records
        .iter()
        .filter_map(|r| r.metadata.get(field))
        .collect::<HashSet<_>>()
        .len()
}

pub fn overview(records: &[&Record]) -> Overview {
    Overview {
        total_complaints: records.len(),
        unique_companies: distinct(records, MetadataField::Company),
        product_types: distinct(records, MetadataField::Product),
        with_narratives: records.iter().filter(|r| r.has_narrative()).count(),
    }
}

/// Occurrences of each present value of `field`. Missing values are skipped.
pub fn value_counts(records: &[&Record], field: MetadataField) -> Vec<Count> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in records.iter().filter_map(|r| r.metadata.get(field)) {
        *counts.entry(value).or_default() += 1;
    }

    let mut counts: Vec<Count> = counts
        .into_iter()
        .map(|(name, count)| Count {
            name: name.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts
}

pub fn top_counts(records: &[&Record], field: MetadataField, n: usize) -> Vec<Count> {
    let mut counts = value_counts(records, field);
    counts.truncate(n);
    counts
}

/// Monthly complaint volume, oldest month first. Undated records are skipped.
pub fn monthly_volume(records: &[&Record]) -> Vec<MonthCount> {
    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for date in records.iter().filter_map(|r| r.metadata.date_received) {
        *months.entry((date.year(), date.month())).or_default() += 1;
    }

    months
        .into_iter()
        .map(|((year, month), count)| MonthCount {
            month: format!("{year:04}-{month:02}"),
            count,
        })
        .collect()
}
