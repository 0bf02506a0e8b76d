use super::user_record::{UserInteraction, UserRecord};
use crate::github::{ApiResult, UserRef, UserSource, unwrap_or_return};

const LOG_TARGET: &str = "  resolver";

/// Resolve a user reference into a complete output record.
///
/// Fetches the profile, then drains the user's organization listing. The record keeps the
/// login from the listing, which is what a resumed crawl checks against. Any failure is
/// returned as-is; retrying is up to the caller.
pub async fn resolve<S: UserSource>(source: &S, user: &UserRef, interaction: UserInteraction) -> ApiResult<UserRecord> {
    log::debug!(target: LOG_TARGET, "Resolving user '{}'", user.login);

    let profile = unwrap_or_return!(source.user(&user.login).await);

    let mut organizations = Vec::new();
    let mut page = 1;
    loop {
        let orgs = unwrap_or_return!(source.user_orgs(&user.login, page).await);
        let is_final = orgs.is_final();
        organizations.extend(orgs.items.into_iter().map(|org| org.login));
        if is_final {
            break;
        }
        page += 1;
    }

    ApiResult::Success(UserRecord {
        username: user.login.clone(),
        ..UserRecord::from_profile(profile, organizations, interaction)
    })
}
