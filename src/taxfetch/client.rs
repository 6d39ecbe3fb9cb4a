// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

// Access to the remote taxonomy and nucleotide databases. The pipeline only sees the
// `SequenceDatabase` trait; `NcbiClient` implements it over the NCBI E-utilities JSON API.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Credentials;
use crate::errors::SeqforgeError;
use crate::taxfetch::filter::SeqSummary;

/// Hard ceiling on the number of records retrieved per search.
pub const SEARCH_CAP: usize = 100;

pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";

const TOOL_NAME: &str = "seqforge";
const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Outcome of a search: the true number of matches and a server-side handle on the result set,
/// of which only the first `retrieved` records will be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHits {
    pub total: usize,
    pub retrieved: usize,
    pub web_env: String,
    pub query_key: String,
}

pub trait SequenceDatabase {
    /// Scientific name of the organism with taxonomic identifier `taxid`.
    fn organism_name(&self, taxid: &str) -> Result<String, SeqforgeError>;

    /// Nucleotide records for `taxid`; at most `cap` of them will be retrievable.
    fn search(&self, taxid: &str, cap: usize) -> Result<SearchHits, SeqforgeError>;

    fn fetch_records(&self, hits: &SearchHits) -> Result<Vec<SeqSummary>, SeqforgeError>;
}

// -- Response parsing --------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(default)]
    result: Option<SummaryResult>,
    #[serde(default)]
    error: Option<String>,
}

// esummary keys each document by its UID, next to a "uids" list giving their order.
#[derive(Debug, Deserialize)]
struct SummaryResult {
    #[serde(default)]
    uids: Vec<String>,
    #[serde(flatten)]
    docs: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TaxonDoc {
    #[serde(default)]
    scientificname: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NucleotideDoc {
    #[serde(default)]
    accessionversion: String,
    #[serde(default)]
    caption: String,
    #[serde(default)]
    slen: usize,
    #[serde(default)]
    title: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    esearchresult: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    count: Option<String>,
    #[serde(default)]
    webenv: Option<String>,
    #[serde(default)]
    querykey: Option<String>,
    #[serde(default, rename = "ERROR")]
    error: Option<String>,
}

fn summary_result(body: &str) -> Result<SummaryResult, SeqforgeError> {
    let envelope: SummaryEnvelope = serde_json::from_str(body)?;
    if let Some(msg) = envelope.error {
        return Err(SeqforgeError::Remote(msg));
    }
    envelope
        .result
        .ok_or_else(|| SeqforgeError::Remote(String::from("Summary response has no result")))
}

pub fn parse_organism_name(taxid: &str, body: &str) -> Result<String, SeqforgeError> {
    let result = summary_result(body)?;
    let doc = result
        .docs
        .get(taxid)
        .ok_or_else(|| SeqforgeError::Remote(format!("No taxonomy entry for taxid {}", taxid)))?;
    let doc: TaxonDoc = serde_json::from_value(doc.clone())?;
    if let Some(msg) = doc.error {
        return Err(SeqforgeError::Remote(format!("taxid {}: {}", taxid, msg)));
    }
    let name = doc.scientificname.trim();
    if name.is_empty() {
        return Err(SeqforgeError::Remote(format!(
            "No organism name for taxid {}",
            taxid
        )));
    }
    Ok(name.to_string())
}

pub fn parse_search(body: &str, cap: usize) -> Result<SearchHits, SeqforgeError> {
    let envelope: SearchEnvelope = serde_json::from_str(body)?;
    let res = envelope.esearchresult;
    if let Some(msg) = res.error {
        return Err(SeqforgeError::Remote(msg));
    }
    let count = res
        .count
        .ok_or_else(|| SeqforgeError::Remote(String::from("Search response has no count")))?;
    let total: usize = count
        .parse()
        .map_err(|_| SeqforgeError::Remote(format!("Bad match count '{}'", count)))?;
    Ok(SearchHits {
        total,
        retrieved: total.min(cap),
        web_env: res.webenv.unwrap_or_default(),
        query_key: res.querykey.unwrap_or_default(),
    })
}

pub fn parse_nucleotide_summaries(body: &str) -> Result<Vec<SeqSummary>, SeqforgeError> {
    let result = summary_result(body)?;
    let mut records = Vec::with_capacity(result.uids.len());
    for uid in &result.uids {
        let Some(value) = result.docs.get(uid) else {
            warn!("UID {} listed without a document", uid);
            continue;
        };
        let doc: NucleotideDoc = serde_json::from_value(value.clone())?;
        if let Some(msg) = doc.error {
            warn!("Skipping UID {}: {}", uid, msg);
            continue;
        }
        let accession = if doc.accessionversion.is_empty() {
            doc.caption
        } else {
            doc.accessionversion
        };
        records.push(SeqSummary {
            accession,
            length: doc.slen,
            description: doc.title,
        });
    }
    Ok(records)
}

// -- HTTP ----------------------------------------------------------------------------------------

enum AttemptError {
    Retryable(String),
    Fatal(String),
}

pub struct NcbiClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl NcbiClient {
    pub fn new(credentials: Credentials) -> Result<Self, SeqforgeError> {
        Self::with_base_url(credentials, EUTILS_BASE_URL)
    }

    pub fn with_base_url(credentials: Credentials, base_url: &str) -> Result<Self, SeqforgeError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(NcbiClient {
            http,
            base_url,
            credentials,
        })
    }

    fn query(&self, params: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut query = params.to_vec();
        query.push(("retmode", String::from("json")));
        query.push(("tool", String::from(TOOL_NAME)));
        if !self.credentials.email.is_empty() {
            query.push(("email", self.credentials.email.clone()));
        }
        if !self.credentials.api_key.is_empty() {
            query.push(("api_key", self.credentials.api_key.clone()));
        }
        query
    }

    fn get_once(&self, url: &str, query: &[(&str, String)]) -> Result<String, AttemptError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .map_err(|e| AttemptError::Retryable(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return resp
                .text()
                .map_err(|e| AttemptError::Retryable(e.to_string()));
        }
        let msg = format!("HTTP {} from {}", status, url);
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(AttemptError::Retryable(msg))
        } else {
            Err(AttemptError::Fatal(msg))
        }
    }

    /// GETs an E-utility, retrying transport errors, 429s and 5xx with exponential backoff.
    fn get(&self, utility: &str, params: &[(&'static str, String)]) -> Result<String, SeqforgeError> {
        let url = format!("{}{}", self.base_url, utility);
        let query = self.query(params);
        debug!(
            "GET {} {:?}",
            url,
            query
                .iter()
                .map(|(k, v)| if *k == "api_key" { (*k, "<redacted>") } else { (*k, v.as_str()) })
                .collect::<Vec<_>>()
        );
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 1;
        loop {
            match self.get_once(&url, &query) {
                Ok(body) => return Ok(body),
                Err(AttemptError::Retryable(msg)) if attempt < MAX_ATTEMPTS => {
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        utility, attempt, MAX_ATTEMPTS, msg, backoff
                    );
                    thread::sleep(backoff);
                    backoff *= 2;
                    attempt += 1;
                }
                Err(AttemptError::Retryable(msg)) | Err(AttemptError::Fatal(msg)) => {
                    return Err(SeqforgeError::Remote(msg));
                }
            }
        }
    }
}

impl SequenceDatabase for NcbiClient {
    fn organism_name(&self, taxid: &str) -> Result<String, SeqforgeError> {
        let body = self.get(
            "esummary.fcgi",
            &[("db", String::from("taxonomy")), ("id", taxid.to_string())],
        )?;
        parse_organism_name(taxid, &body)
    }

    fn search(&self, taxid: &str, cap: usize) -> Result<SearchHits, SeqforgeError> {
        let body = self.get(
            "esearch.fcgi",
            &[
                ("db", String::from("nucleotide")),
                ("term", format!("txid{}[Organism]", taxid)),
                ("usehistory", String::from("y")),
                ("retmax", cap.to_string()),
            ],
        )?;
        let hits = parse_search(&body, cap)?;
        info!("{} matches for taxid {}, retrieving {}", hits.total, taxid, hits.retrieved);
        Ok(hits)
    }

    fn fetch_records(&self, hits: &SearchHits) -> Result<Vec<SeqSummary>, SeqforgeError> {
        if hits.retrieved == 0 {
            return Ok(Vec::new());
        }
        let body = self.get(
            "esummary.fcgi",
            &[
                ("db", String::from("nucleotide")),
                ("WebEnv", hits.web_env.clone()),
                ("query_key", hits.query_key.clone()),
                ("retstart", String::from("0")),
                ("retmax", hits.retrieved.to_string()),
            ],
        )?;
        let records = parse_nucleotide_summaries(&body)?;
        info!("Fetched {} record summaries", records.len());
        Ok(records)
    }
}
