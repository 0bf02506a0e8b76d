use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::crawl::{CrawlTarget, Destination};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::bail;

#[derive(Parser, Debug)]
pub struct ResumeArgs {
    /// Existing output file to continue
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    /// Owner of the repository (default is inferred from the file name)
    #[arg(long, short = 'o', value_name = "OWNER")]
    pub organization: Option<String>,

    /// Name of the repository (default is inferred from the file name)
    #[arg(long, short = 'r', value_name = "NAME")]
    pub repository: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// The repository a resumed crawl targets.
///
/// Flags win over what the file name says. A file name that does not follow the
/// default naming scheme is reported through `warn` and only matters when a flag is missing.
fn resume_target(args: &ResumeArgs, mut warn: impl FnMut(&str)) -> Result<CrawlTarget> {
    if let (Some(owner), Some(name)) = (&args.organization, &args.repository) {
        return CrawlTarget::new(owner.as_str(), name.as_str());
    }

    let inferred = match args.file.file_name().map(CrawlTarget::from_output_filename) {
        Some(Ok(target)) => {
            if args.repository.is_none() && target.name_is_ambiguous_in_file_name() {
                warn(&format!(
                    "repository name '{}' inferred from '{}' may differ from the real one ('..' is written as '__' in file names); pass -r NAME if it is wrong",
                    target.name(),
                    args.file
                ));
            }
            Some(target)
        }
        Some(Err(e)) => {
            warn(&e.to_string());
            None
        }
        None => {
            warn(&format!("'{}' has no file name to infer the repository from", args.file));
            None
        }
    };

    let owner = args
        .organization
        .as_deref()
        .or_else(|| inferred.as_ref().map(CrawlTarget::owner));
    let name = args
        .repository
        .as_deref()
        .or_else(|| inferred.as_ref().map(CrawlTarget::name));

    match (owner, name) {
        (Some(owner), Some(name)) => CrawlTarget::new(owner, name),
        _ => bail!("cannot determine the repository for '{}'; pass -o OWNER -r NAME", args.file),
    }
}

pub async fn process_resume<H: Host>(host: &mut H, args: &ResumeArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;

    let mut warnings = Vec::new();
    let target = resume_target(args, |msg| warnings.push(msg.to_string()));
    for warning in &warnings {
        common.warn(warning);
    }
    let target = target?;

    if !args.file.is_file() {
        bail!("'{}' does not exist; use `ghrr retrieve` to start a new crawl", args.file);
    }

    let destination = Destination::File(args.file.clone());
    let _ = common.crawl(&target, &destination).await?;
    Ok(())
}
