// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

pub mod client;
pub mod filter;
pub mod report;

use log::info;

use crate::errors::SeqforgeError;
use crate::taxfetch::client::{SequenceDatabase, SEARCH_CAP};
use crate::taxfetch::filter::{filter_by_length, LengthRange, SeqSummary};

/// What one taxon query produced. `records` holds only the length-filtered records, in
/// retrieval order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonReport {
    pub taxid: String,
    pub organism: String,
    pub total: usize,
    pub retrieved: usize,
    pub records: Vec<SeqSummary>,
}

impl TaxonReport {
    pub fn chart_title(&self) -> String {
        format!("{} (taxid {}): sequence length by accession", self.organism, self.taxid)
    }
}

/// Resolves the organism, runs a search capped at `SEARCH_CAP`, fetches what it found and
/// keeps the records whose length lies in `range`. Remote failures propagate.
pub fn fetch_and_filter<D: SequenceDatabase + ?Sized>(
    db: &D,
    taxid: &str,
    range: LengthRange,
) -> Result<TaxonReport, SeqforgeError> {
    let organism = db.organism_name(taxid)?;
    info!("taxid {} is {}", taxid, organism);
    let hits = db.search(taxid, SEARCH_CAP)?;
    let fetched = db.fetch_records(&hits)?;
    let records = filter_by_length(fetched, range);
    info!(
        "{} of {} retrieved records within [{}, {}]",
        records.len(),
        hits.retrieved,
        range.min,
        range.max
    );
    Ok(TaxonReport {
        taxid: taxid.to_string(),
        organism,
        total: hits.total,
        retrieved: hits.retrieved,
        records,
    })
}
