// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

// A FastA-style record: the header line (without the leading '>') and the raw sequence. The
// sequence is not checked against any alphabet, so a record may carry an embedded marker.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub header: String,
    pub sequence: String,
}

impl SeqRecord {
    /// Builds a record whose header is `"<id> <description>"`, or just `<id>` when the
    /// description is blank.
    pub fn new(id: &str, description: &str, sequence: String) -> Self {
        let header = if description.trim().is_empty() {
            id.to_string()
        } else {
            format!("{} {}", id, description)
        };
        SeqRecord { header, sequence }
    }
}
