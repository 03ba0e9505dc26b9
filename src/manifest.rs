use crate::errors::{SheetBenchError, SheetBenchResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use uuid::Uuid;

pub const MANIFEST_FILE: &str = "manifest.json";

/// What one synthesis pass wrote to disk. Persisted next to the fixtures so
/// a later harness run can check it is timing the files it thinks it is.
#[derive(Debug, Serialize, Deserialize)]
pub struct FixtureManifest {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub seed: u64,
    pub fixtures: Vec<FixtureEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FixtureEntry {
    pub file: String,
    pub n_cols: usize,
    pub n_rows: usize,
    pub sheets: usize,
    pub size_bytes: u64,
    pub sha256: String,
}

impl FixtureManifest {
    pub fn new(run_id: Uuid, seed: u64) -> Self {
        Self {
            run_id: run_id.to_string(),
            created_at: Utc::now(),
            seed,
            fixtures: Vec::new(),
        }
    }

    pub fn save(&self, dir: &Path) -> SheetBenchResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SheetBenchError::ManifestError(e.to_string()))?;
        std::fs::write(dir.join(MANIFEST_FILE), json)?;
        Ok(())
    }

    pub fn load(dir: &Path) -> SheetBenchResult<Self> {
        let path = dir.join(MANIFEST_FILE);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            SheetBenchError::ManifestError(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&json).map_err(|e| SheetBenchError::ManifestError(e.to_string()))
    }
}

pub fn compute_file_hash<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let count = file.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Re-hash every fixture named by the manifest. Returns the list of
/// mismatch descriptions; empty means the directory matches.
pub fn verify(dir: &Path, manifest: &FixtureManifest) -> SheetBenchResult<Vec<String>> {
    let mut mismatches = Vec::new();
    for entry in &manifest.fixtures {
        let path = dir.join(&entry.file);
        if !path.exists() {
            mismatches.push(format!("{}: missing", entry.file));
            continue;
        }
        let hash = compute_file_hash(&path)?;
        if hash != entry.sha256 {
            mismatches.push(format!(
                "{}: hash mismatch (expected {}, got {})",
                entry.file, entry.sha256, hash
            ));
        }
    }
    Ok(mismatches)
}
