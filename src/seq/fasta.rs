// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use log::info;

use crate::errors::SeqforgeError;
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

/// Characters per sequence line in written FastA.
pub const LINE_WIDTH: usize = 60;

pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, SeqforgeError> {
    let file = File::open(path)?;
    let mut result: SeqFile = Vec::new();
    let mut current_record: Option<SeqRecord> = None;

    for line in BufReader::new(file).lines() {
        let l: String = line?;
        if let Some(hdr) = l.strip_prefix('>') {
            if let Some(rec) = current_record.take() {
                result.push(rec);
            }
            current_record = Some(SeqRecord {
                header: hdr.to_string(),
                sequence: String::new(),
            });
        } else if let Some(rec) = current_record.as_mut() {
            rec.sequence.push_str(l.trim_end());
        } else if !l.trim().is_empty() {
            return Err(SeqforgeError::Format(String::from(
                "Sequence data before first FastA header",
            )));
        }
    }
    if let Some(rec) = current_record {
        result.push(rec);
    }
    Ok(result)
}

/// Writes one record: `>header`, then the sequence in lines of `LINE_WIDTH` characters (the last
/// one possibly shorter). Any content is accepted; nothing is validated.
pub fn write_record<W: Write>(out: &mut W, header: &str, sequence: &str) -> std::io::Result<()> {
    writeln!(out, ">{}", header)?;
    for chunk in &sequence.chars().chunks(LINE_WIDTH) {
        let line: String = chunk.collect();
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Same layout as `write_record`, built in memory.
pub fn format_fasta(header: &str, sequence: &str) -> String {
    let n_lines = sequence.len().div_ceil(LINE_WIDTH);
    let mut text = String::with_capacity(header.len() + sequence.len() + n_lines + 2);
    text.push('>');
    text.push_str(header);
    text.push('\n');
    for chunk in &sequence.chars().chunks(LINE_WIDTH) {
        text.extend(chunk);
        text.push('\n');
    }
    text
}

/// Creates (or truncates) `path` and writes a single record to it. Existing content is replaced,
/// not merged; it is up to the caller to warn beforehand.
pub fn write_fasta<P: AsRef<Path>>(
    path: P,
    header: &str,
    sequence: &str,
) -> Result<(), SeqforgeError> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write_record(&mut out, header, sequence)?;
    out.flush()?;
    info!("Wrote {} characters to {}", sequence.chars().count(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_of_sixty() {
        let seq = "A".repeat(130);
        let text = format_fasta("id desc", &seq);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], ">id desc");
        assert_eq!(
            lines[1..].iter().map(|l| l.len()).collect::<Vec<_>>(),
            vec![60, 60, 10]
        );
    }

    #[test]
    fn exact_multiple_has_no_trailing_short_line() {
        let text = format_fasta("x", &"C".repeat(120));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn empty_sequence_writes_header_only() {
        assert_eq!(format_fasta("x", ""), ">x\n");
    }

    #[test]
    fn multibyte_marker_is_chunked_by_character() {
        let seq = format!("{}Łucja{}", "A".repeat(58), "T".repeat(10));
        let text = format_fasta("m", &seq);
        let body: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(body[0].chars().count(), 60);
        assert_eq!(body.concat(), seq);
    }

    #[test]
    fn small_record_snapshot() {
        let seq = format!("{}{}", "ACGT".repeat(15), "GGCC");
        insta::assert_snapshot!(format_fasta("seq1 a short one", &seq), @r"
        >seq1 a short one
        ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT
        GGCC
        ");
    }

    #[test]
    fn written_file_matches_formatted_text() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("same.fasta");
        let seq = format!("{}Łucja{}", "ACGT".repeat(40), "G".repeat(7));
        write_fasta(&path, "same layout", &seq).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format_fasta("same layout", &seq)
        );
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("rt.fasta");
        let seq: String = "ACGTTGCA".repeat(40);
        write_fasta(&path, "rt round trip", &seq).unwrap();
        let records = read_fasta_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].header, "rt round trip");
        assert_eq!(records[0].sequence, seq);
    }

    #[test]
    fn write_overwrites() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ow.fasta");
        write_fasta(&path, "first", &"A".repeat(200)).unwrap();
        write_fasta(&path, "second", "CC").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, ">second\nCC\n");
    }

    #[test]
    fn read_multiple_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("multi.fas");
        std::fs::write(&path, ">seq1\nGAA\nTTC\n>seq2 second\n\n>seq3\nTTACCG\n").unwrap();
        let fasta = read_fasta_file(&path).unwrap();
        assert_eq!(fasta.len(), 3);
        assert_eq!(fasta[0].sequence, "GAATTC");
        assert_eq!(fasta[1].header, "seq2 second");
        assert_eq!(fasta[1].sequence, "");
        assert_eq!(fasta[2].sequence, "TTACCG");
    }

    #[test]
    fn read_rejects_headerless_data() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bad.fas");
        std::fs::write(&path, "ACGT\n>seq1\nA\n").unwrap();
        assert!(matches!(
            read_fasta_file(&path),
            Err(SeqforgeError::Format(_))
        ));
    }
}
