use super::crawl_target::CrawlTarget;
use super::resolver::resolve;
use super::retry_policy::Retrier;
use super::seen_users::SeenUsers;
use super::sink::OutputSink;
use super::user_record::UserInteraction;
use crate::Result;
use crate::github::UserSource;
use std::io::Write;

const LOG_TARGET: &str = "    walker";

/// Outcome of walking one collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Rows written
    pub written: u64,

    /// References skipped because the user was already recorded
    pub skipped: u64,
}

/// Drain one repository collection into the sink.
///
/// Pages are requested in order until the listing ends. Users already in `seen` are
/// skipped without a profile lookup. Everyone else is resolved and written, retrying
/// the same user according to the retrier until it succeeds. `expected` only feeds
/// the progress display; the walk always runs until the listing ends.
pub async fn walk<S: UserSource, W: Write>(
    source: &S,
    target: &CrawlTarget,
    interaction: UserInteraction,
    expected: Option<u64>,
    retrier: &Retrier<'_>,
    seen: &mut SeenUsers,
    sink: &mut OutputSink<W>,
) -> Result<WalkSummary> {
    let collection = interaction.collection();
    let progress = retrier.progress();
    progress.set_phase(&format!("Fetching {interaction} data"), expected);

    log::info!(target: LOG_TARGET, "Walking {collection} of '{target}'");

    let mut summary = WalkSummary::default();
    let mut page_number = 1;
    loop {
        let page = retrier
            .run(format!("page {page_number} of {collection} for '{target}'"), || {
                source.user_refs(target, collection, page_number)
            })
            .await?;

        let is_final = page.is_final();

        for user in page.items {
            if seen.contains(&user.login) {
                log::trace!(target: LOG_TARGET, "Skipping already recorded user '{}'", user.login);
                summary.skipped += 1;
                progress.advance();
                continue;
            }

            let record = retrier
                .run(format!("user '{}'", user.login), || resolve(source, &user, interaction))
                .await?;

            sink.write(&record)?;
            seen.add(record.username);
            summary.written += 1;
            progress.advance();
        }

        if is_final {
            break;
        }
        page_number += 1;
    }

    log::info!(
        target: LOG_TARGET,
        "Finished {collection} of '{target}': {} written, {} already recorded",
        summary.written,
        summary.skipped
    );

    Ok(summary)
}
