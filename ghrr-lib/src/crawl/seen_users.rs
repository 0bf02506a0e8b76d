use crate::Result;
use camino::Utf8Path;
use ohno::IntoAppError;
use std::collections::HashSet;
use std::fs::File;
use std::io;

const LOG_TARGET: &str = "      seen";

/// Usernames already recorded in the current output target
#[derive(Debug, Default)]
pub struct SeenUsers {
    users: HashSet<String>,
}

impl SeenUsers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from an existing output file: the first field of every row after the header.
    ///
    /// A missing file yields an empty set. Rows of unexpected length, such as a partial
    /// last row left by an interrupted crawl, are still read.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read.
    pub fn seed_from_path(path: &Utf8Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e).into_app_err_with(|| format!("opening existing output file '{path}'")),
        };

        let seen = Self::seed_from_reader(file).into_app_err_with(|| format!("reading existing output file '{path}'"))?;
        log::info!(target: LOG_TARGET, "Found {} previously recorded user(s) in '{path}'", seen.len());
        Ok(seen)
    }

    fn seed_from_reader(reader: impl io::Read) -> core::result::Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

        let mut seen = Self::new();
        for row in csv_reader.records() {
            if let Some(username) = row?.get(0) {
                seen.add(username);
            }
        }

        Ok(seen)
    }

    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.users.contains(username)
    }

    pub fn add(&mut self, username: impl Into<String>) {
        let _ = self.users.insert(username.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
