use super::crawl_target::CrawlTarget;
use super::destination::Destination;
use super::retry_policy::Retrier;
use super::seen_users::SeenUsers;
use super::sink::OutputSink;
use super::user_record::UserInteraction;
use super::walker::{WalkSummary, walk};
use crate::Result;
use crate::github::{RepoSummary, UserSource};
use std::io::Write;

const LOG_TARGET: &str = "   crawler";

/// Totals for one crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Users already recorded in the output before this run
    pub previously_recorded: usize,

    /// Rows written by this run
    pub written: u64,

    /// References skipped because the user was already recorded
    pub skipped: u64,
}

impl CrawlSummary {
    fn add(&mut self, walk: WalkSummary) {
        self.written += walk.written;
        self.skipped += walk.skipped;
    }
}

/// Run one full crawl of `target` into `destination`.
///
/// Resolves the repository, opens the output (seeding the set of recorded users
/// when continuing an existing file), then walks stargazers, subscribers and
/// contributors in that order. Rows for stdout go to `stdout`.
///
/// # Errors
///
/// Fails on errors the retry policy does not absorb: refusals that are not quota
/// problems, exhausted attempt caps, and output I/O errors.
pub async fn retrieve<S: UserSource>(
    source: &S,
    target: &CrawlTarget,
    destination: &Destination,
    retrier: &Retrier<'_>,
    stdout: impl Write,
) -> Result<CrawlSummary> {
    let repo = retrier
        .run(format!("repository '{target}'"), || source.repository(target))
        .await?;

    log::info!(
        target: LOG_TARGET,
        "Repository '{target}' has {} stargazer(s) and {} subscriber(s)",
        display_count(repo.stargazers_count),
        display_count(repo.subscribers_count)
    );

    match destination {
        Destination::Stdout => {
            let mut sink = OutputSink::append(stdout);
            let mut seen = SeenUsers::new();
            let summary = walk_all(source, target, &repo, retrier, &mut seen, &mut sink).await?;
            let _ = sink.finish()?;
            Ok(summary)
        }

        Destination::File(path) => {
            destination.prepare()?;
            let mut sink = OutputSink::open_file(path)?;
            let mut seen = if sink.is_appending() {
                SeenUsers::seed_from_path(path)?
            } else {
                SeenUsers::new()
            };

            let previously_recorded = seen.len();
            let summary = walk_all(source, target, &repo, retrier, &mut seen, &mut sink).await?;
            let _ = sink.finish()?;

            Ok(CrawlSummary {
                previously_recorded,
                ..summary
            })
        }
    }
}

async fn walk_all<S: UserSource, W: Write>(
    source: &S,
    target: &CrawlTarget,
    repo: &RepoSummary,
    retrier: &Retrier<'_>,
    seen: &mut SeenUsers,
    sink: &mut OutputSink<W>,
) -> Result<CrawlSummary> {
    let mut summary = CrawlSummary::default();

    for interaction in UserInteraction::ALL {
        let expected = match interaction {
            UserInteraction::Stargazer => expected_count(repo.stargazers_count),
            UserInteraction::Subscriber => expected_count(repo.subscribers_count),
            UserInteraction::Contributor => None,
        };

        summary.add(walk(source, target, interaction, expected, retrier, seen, sink).await?);
    }

    log::info!(
        target: LOG_TARGET,
        "Crawl of '{target}' complete: {} new row(s), {} already recorded",
        summary.written,
        summary.skipped
    );

    Ok(summary)
}

/// A reported collection size usable for progress, or `None` when unknown
fn expected_count(count: Option<i64>) -> Option<u64> {
    count.and_then(|count| u64::try_from(count).ok()).filter(|&count| count > 0)
}

fn display_count(count: Option<i64>) -> String {
    count.map_or_else(|| "an unknown number of".to_string(), |count| count.to_string())
}
