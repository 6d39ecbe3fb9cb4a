// SPDX-License-Identifier: MIT 
// Copyright (c) 2025 Thomas Junier 

use std::cell::Cell;
use std::path::Path;

use seqforge::errors::SeqforgeError;
use seqforge::prompt::Prompter;
use seqforge::taxfetch::client::{SearchHits, SequenceDatabase};
use seqforge::taxfetch::filter::SeqSummary;

#[allow(dead_code)]
pub fn summary(acc: &str, length: usize, desc: &str) -> SeqSummary {
    SeqSummary {
        accession: acc.to_string(),
        length,
        description: desc.to_string(),
    }
}

#[allow(dead_code)]
pub fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
    Prompter::new(input.as_bytes(), Vec::new())
}

/// Console output with the scratch directory replaced by `<dir>`, for stable snapshots.
#[allow(dead_code)]
pub fn console_text(buf: Vec<u8>, dir: &Path) -> String {
    String::from_utf8(buf)
        .expect("UTF-8 console output")
        .replace(&dir.display().to_string(), "<dir>")
}

/// In-memory stand-in for the remote databases. Knows a single taxon.
#[allow(dead_code)]
pub struct StubDatabase {
    pub taxid: String,
    pub organism: String,
    pub total: usize,
    pub records: Vec<SeqSummary>,
    pub requested_cap: Cell<Option<usize>>,
}

#[allow(dead_code)]
impl StubDatabase {
    pub fn new(taxid: &str, organism: &str, total: usize, records: Vec<SeqSummary>) -> Self {
        StubDatabase {
            taxid: taxid.to_string(),
            organism: organism.to_string(),
            total,
            records,
            requested_cap: Cell::new(None),
        }
    }

    fn check_taxid(&self, taxid: &str) -> Result<(), SeqforgeError> {
        if taxid == self.taxid {
            Ok(())
        } else {
            Err(SeqforgeError::Remote(format!("No taxonomy entry for taxid {}", taxid)))
        }
    }
}

impl SequenceDatabase for StubDatabase {
    fn organism_name(&self, taxid: &str) -> Result<String, SeqforgeError> {
        self.check_taxid(taxid)?;
        Ok(self.organism.clone())
    }

    fn search(&self, taxid: &str, cap: usize) -> Result<SearchHits, SeqforgeError> {
        self.check_taxid(taxid)?;
        self.requested_cap.set(Some(cap));
        Ok(SearchHits {
            total: self.total,
            retrieved: self.total.min(cap),
            web_env: String::from("STUB_WEBENV"),
            query_key: String::from("1"),
        })
    }

    fn fetch_records(&self, hits: &SearchHits) -> Result<Vec<SeqSummary>, SeqforgeError> {
        Ok(self.records.iter().take(hits.retrieved).cloned().collect())
    }
}
