use crate::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Failure to interpret a single line of a line-oriented plink file.
#[derive(thiserror::Error, Debug)]
pub enum EntryError {
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },
    #[error("field {field} ({value:?}) is not a valid {kind}")]
    InvalidField {
        field: usize,
        value: String,
        kind: &'static str,
    },
}

pub trait IndexedEntry: Sized {
    fn from_str(s: &str, ix: usize) -> Result<Self, EntryError>;
}

/// Reads one entry per non-blank line.
pub struct IndexedReader<T: IndexedEntry> {
    path: PathBuf,
    line_num: usize,
    num_read: usize,
    reader: BufReader<File>,
    buffer: String,
    _phantom: PhantomData<T>,
}

impl<T: IndexedEntry> IndexedReader<T> {
    pub fn read_all(path: &Path) -> Result<Vec<T>, Error> {
        let mut reader = IndexedReader::<T>::new(path)?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    pub fn new(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            line_num: 0,
            num_read: 0,
            reader: BufReader::new(file),
            buffer: String::new(),
            _phantom: PhantomData,
        })
    }

    pub fn next_entry(&mut self) -> Result<Option<T>, Error> {
        loop {
            self.buffer.clear();
            let bytes_read = self
                .reader
                .read_line(&mut self.buffer)
                .map_err(|e| Error::io(&self.path, e))?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_num += 1;
            if self.buffer.trim().is_empty() {
                continue;
            }
            let entry = T::from_str(&self.buffer, self.num_read).map_err(|e| {
                Error::InvalidFormat {
                    what: format!("{} line {}", self.path.display(), self.line_num),
                    reason: e.to_string(),
                }
            })?;
            self.num_read += 1;
            return Ok(Some(entry));
        }
    }
}

pub(crate) fn split_fields(s: &str, expected: usize) -> Result<Vec<&str>, EntryError> {
    let fields = s.split_whitespace().collect::<Vec<&str>>();
    if fields.len() < expected {
        return Err(EntryError::MissingFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}
