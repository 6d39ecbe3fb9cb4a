// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use crate::seq::record::SeqRecord;

// Whatever comes out of a FastA file, in file order. Records are not deduplicated by header.

pub type SeqFile = Vec<SeqRecord>;
