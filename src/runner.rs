// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use log::{info, warn};

use clap::{Args, Parser, Subcommand};

use crate::config::{
    find_seqforge_config, Credentials, FetchConfig, GeneratorConfig, SeqforgeConfig,
};
use crate::errors::SeqforgeError;
use crate::prompt::{validate_bound, validate_length, validate_taxid, Prompter};
use crate::seq::fasta::{read_fasta_file, write_fasta};
use crate::seq::generate::{generate, insert_marker, seeded_rng, AnnotatedSequence};
use crate::seq::record::SeqRecord;
use crate::seq::stats::{compute_statistics, Composition};
use crate::taxfetch::client::{NcbiClient, SequenceDatabase};
use crate::taxfetch::filter::LengthRange;
use crate::taxfetch::report::{write_csv, write_length_chart};
use crate::taxfetch::{fetch_and_filter, TaxonReport};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a random DNA sequence, embed a marker in it and save it as FastA
    Gen(GenArgs),
    /// Fetch nucleotide records for a taxon, filter them by length, save a table and a chart
    Taxfetch(FetchArgs),
    /// Print the base composition of every record in a FastA file
    Stats {
        /// FastA file
        fasta: PathBuf,
    },
}

// Anything left unset is asked for interactively.

#[derive(Debug, Default, Args)]
pub struct GenArgs {
    /// Sequence length (positive integer)
    #[arg(short, long, value_parser = parse_length)]
    pub length: Option<usize>,

    /// Sequence identifier; also names the output file
    #[arg(short, long)]
    pub id: Option<String>,

    /// Free-text description for the FastA header
    #[arg(short, long)]
    pub description: Option<String>,

    /// Text to embed at a random position (not counted in the statistics)
    #[arg(short, long)]
    pub marker: Option<String>,

    /// RNG seed, for reproducible output
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Output directory
    #[arg(short, long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Default, Args)]
pub struct FetchArgs {
    /// Contact e-mail sent with every request
    #[arg(short, long)]
    pub email: Option<String>,

    /// NCBI API key
    #[arg(short = 'k', long = "api-key")]
    pub api_key: Option<String>,

    /// Taxonomic identifier (numeric)
    #[arg(short, long, value_parser = parse_taxid)]
    pub taxid: Option<String>,

    /// Minimum sequence length (inclusive)
    #[arg(long = "min-len", value_parser = parse_bound)]
    pub min_len: Option<usize>,

    /// Maximum sequence length (inclusive)
    #[arg(long = "max-len", value_parser = parse_bound)]
    pub max_len: Option<usize>,

    /// Output directory
    #[arg(short, long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,
}

fn parse_length(s: &str) -> Result<usize, String> {
    validate_length(s).map_err(|e| e.to_string())
}

fn parse_bound(s: &str) -> Result<usize, String> {
    validate_bound(s).map_err(|e| e.to_string())
}

fn parse_taxid(s: &str) -> Result<String, String> {
    validate_taxid(s).map_err(|e| e.to_string())
}

fn warn_if_exists<W: Write>(path: &Path, out: &mut W) -> Result<(), SeqforgeError> {
    if path.exists() {
        writeln!(
            out,
            "Warning: file '{}' already exists and will be overwritten.",
            path.display()
        )?;
    }
    Ok(())
}

// -- Generator ---------------------------------------------------------------------------------

pub fn generator_config<R: BufRead, W: Write>(
    args: GenArgs,
    prompter: &mut Prompter<R, W>,
) -> Result<GeneratorConfig, SeqforgeError> {
    let length = match args.length {
        Some(n) => n,
        None => prompter.ask_length("Sequence length: ")?,
    };
    let id = match args.id {
        Some(id) => id,
        None => prompter.ask("Sequence ID: ")?,
    };
    let description = match args.description {
        Some(d) => d,
        None => prompter.ask("Sequence description: ")?,
    };
    let marker = match args.marker {
        Some(m) => m,
        None => prompter.ask("Marker (e.g. your name): ")?,
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    Ok(GeneratorConfig {
        length,
        id,
        description,
        marker,
        seed,
        out_dir: args.out_dir,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOutcome {
    pub path: PathBuf,
    pub sequence: String,
    pub annotated: AnnotatedSequence,
    pub composition: Composition,
}

/// Generates, marks, measures and writes one sequence. Statistics come from the unmarked
/// sequence; the file gets the marked one.
pub fn run_generator<W: Write>(
    cfg: &GeneratorConfig,
    out: &mut W,
) -> Result<GeneratorOutcome, SeqforgeError> {
    info!("Generating {} bases with seed {}", cfg.length, cfg.seed);
    let path = cfg.output_path();
    warn_if_exists(&path, out)?;

    let mut rng = seeded_rng(cfg.seed);
    let sequence = generate(cfg.length, &mut rng)?;
    let annotated = insert_marker(&sequence, &cfg.marker, &mut rng)?;
    let composition = compute_statistics(&sequence)?;

    let record = SeqRecord::new(&cfg.id, &cfg.description, annotated.sequence.clone());
    write_fasta(&path, &record.header, &record.sequence)?;

    writeln!(out)?;
    writeln!(out, "Sequence saved to {}", path.display())?;
    writeln!(out, "Sequence statistics:")?;
    writeln!(out, "{}", composition)?;

    Ok(GeneratorOutcome {
        path,
        sequence,
        annotated,
        composition,
    })
}

// -- Taxon fetch -------------------------------------------------------------------------------

/// Flags first, then the config file, then the prompt.
pub fn fetch_config<R: BufRead, W: Write>(
    args: FetchArgs,
    file_credentials: Option<Credentials>,
    prompter: &mut Prompter<R, W>,
) -> Result<FetchConfig, SeqforgeError> {
    let from_file = file_credentials.unwrap_or_default();
    let email = match args.email {
        Some(e) => e,
        None if !from_file.email.is_empty() => from_file.email,
        None => prompter.ask("Email: ")?,
    };
    let api_key = match args.api_key {
        Some(k) => k,
        None if !from_file.api_key.is_empty() => from_file.api_key,
        None => prompter.ask("API key: ")?,
    };
    let taxid = match args.taxid {
        Some(t) => t,
        None => prompter.ask_validated("TaxID: ", validate_taxid)?,
    };
    let min = match args.min_len {
        Some(n) => n,
        None => prompter.ask_validated("Min length: ", validate_bound)?,
    };
    let max = match args.max_len {
        Some(n) => n,
        None => prompter.ask_validated("Max length: ", validate_bound)?,
    };
    let range = LengthRange::new(min, max);
    if range.is_empty() {
        warn!("Minimum length {} exceeds maximum {}; nothing will be kept", min, max);
    }
    Ok(FetchConfig {
        credentials: Credentials { email, api_key },
        taxid: taxid.trim().to_string(),
        range,
        out_dir: args.out_dir,
    })
}

pub fn run_taxfetch<D: SequenceDatabase + ?Sized, W: Write>(
    db: &D,
    cfg: &FetchConfig,
    out: &mut W,
) -> Result<TaxonReport, SeqforgeError> {
    let report = fetch_and_filter(db, &cfg.taxid, cfg.range)?;
    writeln!(out, "Organism: {}", report.organism)?;
    writeln!(
        out,
        "Found: {} (retrieving {})",
        report.total, report.retrieved
    )?;
    writeln!(out, "Filtered: {}", report.records.len())?;

    let csv_path = cfg.csv_path();
    let chart_path = cfg.chart_path();
    warn_if_exists(&csv_path, out)?;
    warn_if_exists(&chart_path, out)?;
    write_csv(&csv_path, &report.records)?;
    write_length_chart(&chart_path, &report.chart_title(), &report.records)?;
    writeln!(
        out,
        "Saved: {} + {}",
        csv_path.display(),
        chart_path.display()
    )?;
    Ok(report)
}

// -- Stats -------------------------------------------------------------------------------------

/// Composition of each record, `None` for records without sequence.
pub fn run_stats<W: Write>(
    path: &Path,
    out: &mut W,
) -> Result<Vec<Option<Composition>>, SeqforgeError> {
    let seq_file = read_fasta_file(path)?;
    info!("Read {} records from {}", seq_file.len(), path.display());
    let mut result = Vec::with_capacity(seq_file.len());
    for rec in &seq_file {
        writeln!(out, ">{}", rec.header)?;
        match compute_statistics(&rec.sequence) {
            Ok(comp) => {
                writeln!(out, "{}", comp)?;
                result.push(Some(comp));
            }
            Err(SeqforgeError::EmptySequence) => {
                writeln!(out, "(empty sequence)")?;
                result.push(None);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(result)
}

fn load_file_credentials() -> Option<Credentials> {
    let path = find_seqforge_config()?;
    match SeqforgeConfig::from_file(&path) {
        Ok(cfg) => cfg.ncbi,
        Err(e) => {
            warn!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}

pub fn run() -> Result<(), SeqforgeError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    match cli.command {
        Command::Gen(args) => {
            let cfg = generator_config(args, &mut prompter)?;
            run_generator(&cfg, prompter.output())?;
        }
        Command::Taxfetch(args) => {
            let cfg = fetch_config(args, load_file_credentials(), &mut prompter)?;
            let client = NcbiClient::new(cfg.credentials.clone())?;
            run_taxfetch(&client, &cfg, prompter.output())?;
        }
        Command::Stats { fasta } => {
            run_stats(&fasta, prompter.output())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_rejects_bad_length_flag() {
        for bad in ["0", "-5", "ten"] {
            let res = Cli::try_parse_from(["seqforge", "gen", "--length", bad]);
            assert!(res.is_err(), "accepted --length {}", bad);
        }
    }

    #[test]
    fn cli_parses_gen_flags() {
        let cli = Cli::try_parse_from([
            "seqforge", "gen", "-l", "130", "-i", "seq1", "-d", "desc", "-m", "X", "-s", "5",
        ])
        .unwrap();
        match cli.command {
            Command::Gen(args) => {
                assert_eq!(args.length, Some(130));
                assert_eq!(args.seed, Some(5));
                assert_eq!(args.out_dir, PathBuf::from("."));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn cli_parses_taxfetch_flags() {
        let cli = Cli::try_parse_from([
            "seqforge", "taxfetch", "--taxid", "9606", "--min-len", "100", "--max-len", "500",
        ])
        .unwrap();
        match cli.command {
            Command::Taxfetch(args) => {
                assert_eq!(args.taxid.as_deref(), Some("9606"));
                assert_eq!(args.min_len, Some(100));
                assert_eq!(args.max_len, Some(500));
                assert!(args.email.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn cli_rejects_non_numeric_taxid() {
        assert!(Cli::try_parse_from(["seqforge", "taxfetch", "--taxid", "human"]).is_err());
    }
}
