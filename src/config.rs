// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::errors::SeqforgeError;
use crate::taxfetch::filter::LengthRange;

pub const CONFIG_FILE_NAME: &str = ".seqforgeconfig";

/// Everything one generator run needs; built up front from flags and prompts.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub length: usize,
    pub id: String,
    pub description: String,
    pub marker: String,
    pub seed: u64,
    pub out_dir: PathBuf,
}

impl GeneratorConfig {
    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.fasta", self.id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub credentials: Credentials,
    pub taxid: String,
    pub range: LengthRange,
    pub out_dir: PathBuf,
}

impl FetchConfig {
    fn stem(&self) -> String {
        format!("taxid_{}", self.taxid)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.csv", self.stem()))
    }

    pub fn chart_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.png", self.stem()))
    }
}

/// Contents of `.seqforgeconfig`. Only credentials live there for now.
#[derive(Debug, Default, Deserialize)]
pub struct SeqforgeConfig {
    #[serde(default)]
    pub ncbi: Option<Credentials>,
}

impl SeqforgeConfig {
    pub fn from_file(path: &Path) -> Result<Self, SeqforgeError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SeqforgeError> {
        Ok(serde_json::from_str(text)?)
    }
}

pub fn find_seqforge_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
