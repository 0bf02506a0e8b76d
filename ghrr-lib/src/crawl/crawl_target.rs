use crate::Result;
use chrono::NaiveDate;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use url::Url;

const FILE_PREFIX: &str = "ghusers_";
const FILE_EXTENSION: &str = ".csv";

/// The repository being crawled
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTarget {
    owner: String,
    name: String,
}

impl CrawlTarget {
    /// Create a target from an owner and a repository name.
    ///
    /// # Errors
    ///
    /// Fails if either part is empty or contains a slash.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let owner = owner.into().trim().to_string();
        let name = name.into().trim().to_string();

        if owner.is_empty() || name.is_empty() {
            bail!("repository owner and name must both be non-empty (got '{owner}/{name}')");
        }

        if owner.contains('/') || name.contains('/') {
            bail!("repository owner and name must not contain '/' (got '{owner}/{name}')");
        }

        Ok(Self { owner, name })
    }

    /// Parse an `OWNER/NAME` pair.
    ///
    /// # Errors
    ///
    /// Fails unless the input is exactly two non-empty, slash-separated parts.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !name.contains('/') => Self::new(owner, name),
            _ => bail!("expected a repository in the form OWNER/NAME, got '{s}'"),
        }
    }

    /// Parse a repository URL such as `https://github.com/OWNER/NAME`.
    ///
    /// A trailing `.git` and any path segments after the name are ignored.
    ///
    /// # Errors
    ///
    /// Fails if the URL cannot be parsed or has fewer than two path segments.
    pub fn from_url(s: &str) -> Result<Self> {
        let url = Url::parse(s.trim()).into_app_err_with(|| format!("parsing repository URL '{s}'"))?;

        let mut segments = url.path_segments().into_iter().flatten().filter(|segment| !segment.is_empty());
        let (Some(owner), Some(name)) = (segments.next(), segments.next()) else {
            bail!("repository URL '{s}' does not name an owner and a repository");
        };

        Self::new(owner, name.strip_suffix(".git").unwrap_or(name))
    }

    /// Infer the target from a default-style output file name, `ghusers_{owner}_{name}_{YYYY-MM-DD}.csv`.
    ///
    /// Owners cannot contain underscores, so the first underscore after the prefix
    /// separates the owner from the name.
    ///
    /// # Errors
    ///
    /// Fails if the file name does not follow the default naming scheme.
    pub fn from_output_filename(file_name: &str) -> Result<Self> {
        let malformed = || format!("cannot infer the repository from file name '{file_name}'");

        let Some(stem) = file_name
            .strip_prefix(FILE_PREFIX)
            .and_then(|rest| rest.strip_suffix(FILE_EXTENSION))
        else {
            bail!("{}", malformed());
        };

        let Some((owner_and_name, date)) = stem.rsplit_once('_') else {
            bail!("{}", malformed());
        };

        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            bail!("{}", malformed());
        }

        let Some((owner, name)) = owner_and_name.split_once('_') else {
            bail!("{}", malformed());
        };

        Self::new(owner, name)
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the name may have been rewritten when the output file name was built.
    ///
    /// File names replace `..` with `__`, so a name read back from a file name that
    /// contains `__` cannot be told apart from one that contained `..`.
    #[must_use]
    pub fn name_is_ambiguous_in_file_name(&self) -> bool {
        self.name.contains("__")
    }

    /// Default output file name for a crawl of this target started on `date`
    #[must_use]
    pub fn output_filename(&self, date: NaiveDate) -> String {
        format!(
            "{FILE_PREFIX}{}_{}_{}{FILE_EXTENSION}",
            sanitize_path_component(&self.owner),
            sanitize_path_component(&self.name),
            date.format("%Y-%m-%d")
        )
    }
}

impl Display for CrawlTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Make a string safe to embed in a file name.
///
/// `..` sequences and characters that are separators or reserved on common filesystems become `_`.
fn sanitize_path_component(s: &str) -> String {
    s.replace("..", "__")
        .replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_")
}
