use super::user_record::UserRecord;
use crate::Result;
use camino::Utf8Path;
use ohno::IntoAppError;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};

const LOG_TARGET: &str = "      sink";

/// Column names of the output file, in order
pub const HEADER: [&str; 8] = [
    "username",
    "company",
    "organizations",
    "email",
    "location",
    "followers_count",
    "public_repos_count",
    "user_interaction",
];

/// Row-oriented CSV writer for user records.
///
/// Every row is flushed as soon as it is written.
#[derive(Debug)]
pub struct OutputSink<W: Write> {
    writer: csv::Writer<W>,
    appending: bool,
    rows_written: u64,
}

impl<W: Write> OutputSink<W> {
    /// Start a new output, writing the header row.
    ///
    /// # Errors
    ///
    /// Fails if the header cannot be written.
    pub fn create(inner: W) -> Result<Self> {
        let mut sink = Self::new(inner, false);
        sink.writer.write_record(HEADER).into_app_err("writing header row")?;
        sink.writer.flush().into_app_err("writing header row")?;
        Ok(sink)
    }

    /// Continue an existing output; no header is written.
    #[must_use]
    pub fn append(inner: W) -> Self {
        Self::new(inner, true)
    }

    fn new(inner: W, appending: bool) -> Self {
        Self {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(inner),
            appending,
            rows_written: 0,
        }
    }

    /// Whether this sink continues previously written output
    #[must_use]
    pub const fn is_appending(&self) -> bool {
        self.appending
    }

    #[must_use]
    pub const fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Write and flush one row.
    ///
    /// # Errors
    ///
    /// Fails if the row cannot be written to the underlying stream.
    pub fn write(&mut self, record: &UserRecord) -> Result<()> {
        let followers = record.followers_count.to_string();
        let repos = record.public_repos_count.to_string();
        let organizations = record.organizations_field();

        self.writer
            .write_record([
                record.username.as_str(),
                record.company.as_deref().unwrap_or_default(),
                organizations.as_str(),
                record.email.as_deref().unwrap_or_default(),
                record.location.as_deref().unwrap_or_default(),
                followers.as_str(),
                repos.as_str(),
                record.user_interaction.label(),
            ])
            .into_app_err_with(|| format!("writing row for user '{}'", record.username))?;

        self.writer
            .flush()
            .into_app_err_with(|| format!("flushing row for user '{}'", record.username))?;

        self.rows_written += 1;
        Ok(())
    }

    /// Flush and release the underlying stream.
    ///
    /// # Errors
    ///
    /// Fails if buffered output cannot be flushed.
    pub fn finish(self) -> Result<W> {
        log::debug!(target: LOG_TARGET, "Closing output after {} new row(s)", self.rows_written);
        self.writer.into_inner().map_err(csv::IntoInnerError::into_error).into_app_err("closing output")
    }
}

impl OutputSink<File> {
    /// Open an output file.
    ///
    /// A missing or empty file is created with a header row. A non-empty file is opened
    /// for appending; if its last row was cut short, a line break is added first so new
    /// rows start on a fresh line.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, inspected, or written.
    pub fn open_file(path: &Utf8Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)
            .into_app_err_with(|| format!("opening output file '{path}'"))?;

        let len = file
            .metadata()
            .into_app_err_with(|| format!("inspecting output file '{path}'"))?
            .len();

        if len == 0 {
            log::info!(target: LOG_TARGET, "Writing new output file '{path}'");
            return Self::create(file);
        }

        log::info!(target: LOG_TARGET, "Appending to existing output file '{path}'");

        let mut last = [0u8; 1];
        let _ = file
            .seek(SeekFrom::End(-1))
            .into_app_err_with(|| format!("inspecting output file '{path}'"))?;
        file.read_exact(&mut last)
            .into_app_err_with(|| format!("inspecting output file '{path}'"))?;

        if last[0] != b'\n' {
            log::debug!(target: LOG_TARGET, "Output file '{path}' ends with a partial row, starting a new line");
            file.write_all(b"\n")
                .into_app_err_with(|| format!("writing to output file '{path}'"))?;
        }

        Ok(Self::append(file))
    }
}
