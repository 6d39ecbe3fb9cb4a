// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fmt;

use crate::errors::SeqforgeError;

/// Percentage share of each base in a sequence, plus GC content. All values are rounded to one
/// decimal place.
///
/// `gc` is computed from the raw C and G counts, not by adding the rounded `c` and `g`, so the
/// two can differ in the last digit (e.g. "ACG": c + g = 66.6, gc = 66.7).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    pub a: f64,
    pub c: f64,
    pub g: f64,
    pub t: f64,
    pub gc: f64,
}

impl Composition {
    /// Sum of the four base shares; 100 give or take rounding for a pure ACGT sequence.
    pub fn base_total(&self) -> f64 {
        self.a + self.c + self.g + self.t
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "A: {:.1}%", self.a)?;
        writeln!(f, "C: {:.1}%", self.c)?;
        writeln!(f, "G: {:.1}%", self.g)?;
        writeln!(f, "T: {:.1}%", self.t)?;
        write!(f, "%CG: {:.1}", self.gc)
    }
}

// One decimal, half-to-even on the exact binary value of `x`. Float formatting is exact, so
// going through the decimal string avoids the extra rounding step of scaling by ten.
fn round1(x: f64) -> f64 {
    format!("{:.1}", x).parse().unwrap_or(x)
}

fn percent(count: usize, total: usize) -> f64 {
    round1(count as f64 / total as f64 * 100.0)
}

/// Counts A, C, G and T (case-sensitive) and expresses each as a share of the whole sequence
/// length. Characters outside the alphabet count towards the length only.
pub fn compute_statistics(sequence: &str) -> Result<Composition, SeqforgeError> {
    if sequence.is_empty() {
        return Err(SeqforgeError::EmptySequence);
    }
    let mut counts = [0usize; 4];
    let mut total = 0usize;
    for ch in sequence.chars() {
        total += 1;
        match ch {
            'A' => counts[0] += 1,
            'C' => counts[1] += 1,
            'G' => counts[2] += 1,
            'T' => counts[3] += 1,
            _ => {}
        }
    }
    let [a, c, g, t] = counts;
    Ok(Composition {
        a: percent(a, total),
        c: percent(c, total),
        g: percent(g, total),
        t: percent(t, total),
        gc: percent(c + g, total),
    })
}
