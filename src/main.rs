// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use seqforge::errors::SeqforgeError;

fn main() -> Result<(), SeqforgeError> {
    seqforge::run()
}
