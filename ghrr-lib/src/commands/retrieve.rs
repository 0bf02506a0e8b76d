use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::crawl::CrawlTarget;
use clap::Parser;
use ohno::bail;

#[derive(Parser, Debug)]
pub struct RetrieveArgs {
    /// Repository to crawl (format: `OWNER/NAME`)
    #[arg(value_name = "OWNER/NAME", conflicts_with_all = ["organization", "repository", "url"])]
    pub repo: Option<String>,

    /// Owner of the repository to crawl
    #[arg(long, short = 'o', value_name = "OWNER", requires = "repository")]
    pub organization: Option<String>,

    /// Name of the repository to crawl
    #[arg(long, short = 'r', value_name = "NAME", requires = "organization")]
    pub repository: Option<String>,

    /// URL of the repository to crawl (e.g. `https://github.com/OWNER/NAME`)
    #[arg(long, value_name = "URL", conflicts_with_all = ["organization", "repository"])]
    pub url: Option<String>,

    /// Output CSV file; `-` streams rows to standard output (default is a dated file in the output directory)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl RetrieveArgs {
    /// The repository named by whichever form of argument was given
    pub fn target(&self) -> Result<CrawlTarget> {
        if let Some(repo) = &self.repo {
            return CrawlTarget::parse(repo);
        }

        if let Some(url) = &self.url {
            return CrawlTarget::from_url(url);
        }

        match (&self.organization, &self.repository) {
            (Some(owner), Some(name)) => CrawlTarget::new(owner.as_str(), name.as_str()),
            _ => bail!("no repository given; use OWNER/NAME, --url, or -o OWNER -r NAME"),
        }
    }
}

pub async fn process_retrieve<H: Host>(host: &mut H, args: &RetrieveArgs) -> Result<()> {
    let target = args.target()?;
    let mut common = Common::new(host, &args.common)?;

    let destination = common.destination(&target, args.file.as_deref());
    let _ = common.crawl(&target, &destination).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RetrieveArgs {
        RetrieveArgs::try_parse_from(std::iter::once("retrieve").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_target_from_flags() {
        let args = parse(&["-o", "octo", "-r", "widgets"]);
        assert_eq!(args.target().unwrap(), CrawlTarget::new("octo", "widgets").unwrap());
        assert_eq!(args.file, None);
    }

    #[test]
    fn test_target_from_positional() {
        let args = parse(&["octo/widgets", "-f", "-"]);
        assert_eq!(args.target().unwrap().to_string(), "octo/widgets");
        assert_eq!(args.file.as_deref(), Some("-"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri is slow with url parsing")]
    fn test_target_from_url() {
        let args = parse(&["--url", "https://github.com/octo/widgets.git"]);
        assert_eq!(args.target().unwrap().to_string(), "octo/widgets");
    }

    #[test]
    fn test_target_missing() {
        let args = parse(&[]);
        let _ = args.target().unwrap_err();
    }

    #[test]
    fn test_organization_requires_repository() {
        let _ = RetrieveArgs::try_parse_from(["retrieve", "-o", "octo"]).unwrap_err();
    }

    #[test]
    fn test_positional_conflicts_with_flags() {
        let _ = RetrieveArgs::try_parse_from(["retrieve", "octo/widgets", "-o", "octo", "-r", "widgets"]).unwrap_err();
    }
}
