use super::crawl_target::CrawlTarget;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use core::fmt::{Display, Formatter};
use ohno::IntoAppError;
use std::fs;

/// Path argument that selects standard output instead of a file
pub const STDOUT_SENTINEL: &str = "-";

/// Where crawl rows go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(Utf8PathBuf),
}

impl Destination {
    /// Pick the destination for a crawl.
    ///
    /// `-` selects standard output. Without an explicit path, the file is named after
    /// the target and `today`, so repeated runs on the same day resume the same file.
    #[must_use]
    pub fn resolve(path: Option<&str>, output_dir: &Utf8Path, target: &CrawlTarget, today: NaiveDate) -> Self {
        match path {
            Some(STDOUT_SENTINEL) => Self::Stdout,
            Some(path) => Self::File(Utf8PathBuf::from(path)),
            None => Self::File(output_dir.join(target.output_filename(today))),
        }
    }

    /// Whether interactive progress may be shown while writing here
    #[must_use]
    pub const fn shows_progress(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Create the directory that will hold the output file, if needed.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created.
    pub fn prepare(&self) -> Result<()> {
        if let Self::File(path) = self
            && let Some(dir) = path.parent()
            && !dir.as_str().is_empty()
        {
            fs::create_dir_all(dir).into_app_err_with(|| format!("creating output directory '{dir}'"))?;
        }

        Ok(())
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Stdout => f.write_str(STDOUT_SENTINEL),
            Self::File(path) => write!(f, "{path}"),
        }
    }
}
