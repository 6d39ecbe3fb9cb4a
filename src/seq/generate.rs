// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use log::debug;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::errors::SeqforgeError;

pub const BASES: [u8; 4] = *b"ACGT";

/// The generator's RNG. Any `Rng` works with the functions below; this is the one the CLI uses so
/// that a given `--seed` always reproduces the same run.
pub type SeqRng = Xoshiro256PlusPlus;

pub fn seeded_rng(seed: u64) -> SeqRng {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// Draws `length` bases independently and uniformly from A, C, G and T.
///
/// A zero length is rejected with `InvalidLength` before anything is drawn.
pub fn generate<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<String, SeqforgeError> {
    if length == 0 {
        return Err(SeqforgeError::InvalidLength(length.to_string()));
    }
    let seq: String = (0..length)
        .map(|_| BASES[rng.gen_range(0..BASES.len())] as char)
        .collect();
    Ok(seq)
}

/// A sequence with a marker spliced in at `offset`. Used for output only: composition is always
/// computed on the sequence the marker went into, never on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSequence {
    pub sequence: String,
    pub offset: usize,
    pub marker_len: usize,
}

impl AnnotatedSequence {
    pub fn marker(&self) -> &str {
        &self.sequence[self.offset..self.offset + self.marker_len]
    }

    /// The sequence with the marker cut back out.
    pub fn strip_marker(&self) -> String {
        let mut out = String::with_capacity(self.sequence.len() - self.marker_len);
        out.push_str(&self.sequence[..self.offset]);
        out.push_str(&self.sequence[self.offset + self.marker_len..]);
        out
    }
}

/// Splices `marker` at an offset drawn uniformly from `0..=len(sequence)`, so both ends are
/// possible. The marker is opaque text.
pub fn insert_marker<R: Rng + ?Sized>(
    sequence: &str,
    marker: &str,
    rng: &mut R,
) -> Result<AnnotatedSequence, SeqforgeError> {
    let offset = rng.gen_range(0..=sequence.chars().count());
    // Offset counts characters; convert to a byte position for slicing.
    let byte_offset = sequence
        .char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(sequence.len());
    debug!("Inserting {}-byte marker at offset {}", marker.len(), offset);
    splice_marker(sequence, marker, byte_offset)
}

/// Deterministic half of `insert_marker`: splices `marker` at byte `offset`.
pub fn splice_marker(
    sequence: &str,
    marker: &str,
    offset: usize,
) -> Result<AnnotatedSequence, SeqforgeError> {
    if !sequence.is_char_boundary(offset) {
        return Err(SeqforgeError::Format(format!(
            "Marker offset {} is not a valid position in a sequence of length {}",
            offset,
            sequence.len()
        )));
    }
    let mut annotated = String::with_capacity(sequence.len() + marker.len());
    annotated.push_str(&sequence[..offset]);
    annotated.push_str(marker);
    annotated.push_str(&sequence[offset..]);
    Ok(AnnotatedSequence {
        sequence: annotated,
        offset,
        marker_len: marker.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_has_requested_length_and_alphabet() {
        let mut rng = seeded_rng(42);
        for len in [1, 7, 60, 1000] {
            let seq = generate(len, &mut rng).expect("positive length");
            assert_eq!(len, seq.len());
            assert!(seq.bytes().all(|b| BASES.contains(&b)));
        }
    }

    #[test]
    fn generate_is_reproducible_from_seed() {
        let a = generate(500, &mut seeded_rng(7)).unwrap();
        let b = generate(500, &mut seeded_rng(7)).unwrap();
        let c = generate(500, &mut seeded_rng(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn generate_uses_all_bases() {
        let seq = generate(10_000, &mut seeded_rng(42)).unwrap();
        for base in BASES {
            assert!(seq.bytes().any(|b| b == base));
        }
    }

    #[test]
    fn generate_rejects_zero() {
        let res = generate(0, &mut seeded_rng(1));
        assert!(matches!(res, Err(SeqforgeError::InvalidLength(_))));
    }

    #[test]
    fn splice_in_middle() {
        let ann = splice_marker("ACGT", "X", 2).unwrap();
        assert_eq!(ann.sequence, "ACXGT");
        assert_eq!(ann.marker(), "X");
        assert_eq!(ann.strip_marker(), "ACGT");
    }

    #[test]
    fn splice_at_both_ends() {
        assert_eq!(splice_marker("ACGT", "NAME", 0).unwrap().sequence, "NAMEACGT");
        assert_eq!(splice_marker("ACGT", "NAME", 4).unwrap().sequence, "ACGTNAME");
    }

    #[test]
    fn splice_past_end_is_an_error() {
        assert!(splice_marker("ACGT", "X", 5).is_err());
    }

    #[test]
    fn insert_marker_preserves_sequence() {
        let mut rng = seeded_rng(3);
        let seq = generate(200, &mut rng).unwrap();
        for marker in ["", "X", "Marta", "Łucja"] {
            let ann = insert_marker(&seq, marker, &mut rng).unwrap();
            assert_eq!(ann.sequence.len(), seq.len() + marker.len());
            assert_eq!(ann.marker(), marker);
            assert_eq!(ann.strip_marker(), seq);
        }
    }

    #[test]
    fn insert_marker_reaches_both_ends() {
        let mut rng = seeded_rng(11);
        let mut seen_start = false;
        let mut seen_end = false;
        for _ in 0..200 {
            let ann = insert_marker("AC", "X", &mut rng).unwrap();
            seen_start |= ann.offset == 0;
            seen_end |= ann.offset == 2;
        }
        assert!(seen_start && seen_end);
    }
}
