//! Candidate input from CSV.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::InputError;

/// A `(domain, owner)` pair read from the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub domain: String,
    pub owner: String,
}

impl Candidate {
    pub fn new(domain: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            owner: owner.into(),
        }
    }
}

/// Lazy reader over the candidate rows of a CSV file.
///
/// The file must have a header row with `domain` and `owner` columns.
/// Other columns are ignored.
pub struct CandidateReader {
    path: PathBuf,
    rows: csv::StringRecordsIntoIter<File>,
    domain_idx: usize,
    owner_idx: usize,
}

impl std::fmt::Debug for CandidateReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateReader")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CandidateReader {
    /// Open `path` and validate its header row.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref().to_path_buf();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|source| InputError::Open {
                path: path.clone(),
                source,
            })?;

        let headers = reader.headers().map_err(|e| InputError::Malformed {
            path: path.clone(),
            line: 1,
            message: e.to_string(),
        })?;
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| InputError::MissingColumn {
                    path: path.clone(),
                    column: name,
                })
        };
        let domain_idx = column("domain")?;
        let owner_idx = column("owner")?;

        Ok(Self {
            rows: reader.into_records(),
            path,
            domain_idx,
            owner_idx,
        })
    }

    fn malformed(&self, line: u64, message: impl Into<String>) -> InputError {
        InputError::Malformed {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }
}

impl Iterator for CandidateReader {
    type Item = Result<Candidate, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.rows.next()? {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                return Some(Err(self.malformed(line, e.to_string())));
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let domain = row.get(self.domain_idx).unwrap_or_default();
        let owner = row.get(self.owner_idx).unwrap_or_default();
        if domain.is_empty() {
            return Some(Err(self.malformed(line, "empty domain")));
        }
        if owner.is_empty() {
            return Some(Err(self.malformed(line, format!("empty owner for '{domain}'"))));
        }

        Some(Ok(Candidate::new(domain, owner)))
    }
}

/// Read every candidate from `path`, failing on the first bad row.
pub fn read_candidates(path: impl AsRef<Path>) -> Result<Vec<Candidate>, InputError> {
    CandidateReader::open(path)?.collect()
}
