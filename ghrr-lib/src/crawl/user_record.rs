use crate::github::{Collection, UserProfile};
use core::fmt::{Display, Formatter};

/// Which walk produced a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserInteraction {
    Stargazer,
    Subscriber,
    Contributor,
}

impl UserInteraction {
    /// All interactions, in the order the crawl walks them
    pub const ALL: [Self; 3] = [Self::Stargazer, Self::Subscriber, Self::Contributor];

    /// The value written to the `user_interaction` column
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stargazer => "stargazer",
            Self::Subscriber => "subscriber",
            Self::Contributor => "contributor",
        }
    }

    /// The repository collection walked to find users with this interaction
    #[must_use]
    pub const fn collection(self) -> Collection {
        match self {
            Self::Stargazer => Collection::Stargazers,
            Self::Subscriber => Collection::Subscribers,
            Self::Contributor => Collection::Contributors,
        }
    }
}

impl Display for UserInteraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// One output row: a resolved user profile tagged with the interaction that found it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub company: Option<String>,
    pub organizations: Vec<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub followers_count: u64,
    pub public_repos_count: u64,
    pub user_interaction: UserInteraction,
}

impl UserRecord {
    #[must_use]
    pub fn from_profile(profile: UserProfile, organizations: Vec<String>, user_interaction: UserInteraction) -> Self {
        Self {
            username: profile.login,
            company: profile.company.map(|company| normalize_company(&company)),
            organizations,
            email: profile.email,
            location: profile.location,
            followers_count: profile.followers,
            public_repos_count: profile.public_repos,
            user_interaction,
        }
    }

    /// The `organizations` column, in list text form (`['org-a', 'org-b']`)
    #[must_use]
    pub fn organizations_field(&self) -> String {
        let quoted: Vec<String> = self.organizations.iter().map(|org| format!("'{org}'")).collect();
        format!("[{}]", quoted.join(", "))
    }
}

/// Strip every `@` from a company name
fn normalize_company(company: &str) -> String {
    if company.is_empty() {
        return String::new();
    }

    company.replace('@', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(company: Option<&str>) -> UserProfile {
        UserProfile {
            login: "octocat".to_string(),
            company: company.map(str::to_string),
            email: Some("octocat@github.com".to_string()),
            location: None,
            followers: 12,
            public_repos: 3,
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(UserInteraction::Stargazer.label(), "stargazer");
        assert_eq!(UserInteraction::Subscriber.to_string(), "subscriber");
        assert_eq!(UserInteraction::Contributor.label(), "contributor");
    }

    #[test]
    fn test_walk_order() {
        let collections: Vec<_> = UserInteraction::ALL.iter().map(|i| i.collection()).collect();
        assert_eq!(
            collections,
            vec![Collection::Stargazers, Collection::Subscribers, Collection::Contributors]
        );
    }

    #[test]
    fn test_company_leading_at_removed() {
        let record = UserRecord::from_profile(profile(Some("@Acme")), vec![], UserInteraction::Stargazer);
        assert_eq!(record.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_company_inner_at_removed() {
        let record = UserRecord::from_profile(profile(Some("Ac@me Inc")), vec![], UserInteraction::Stargazer);
        assert_eq!(record.company.as_deref(), Some("Acme Inc"));
    }

    #[test]
    fn test_company_absent_or_empty() {
        let record = UserRecord::from_profile(profile(None), vec![], UserInteraction::Stargazer);
        assert_eq!(record.company, None);

        let record = UserRecord::from_profile(profile(Some("")), vec![], UserInteraction::Stargazer);
        assert_eq!(record.company.as_deref(), Some(""));
    }

    #[test]
    fn test_from_profile_copies_fields() {
        let record = UserRecord::from_profile(profile(None), vec!["rust-lang".to_string()], UserInteraction::Contributor);
        assert_eq!(record.username, "octocat");
        assert_eq!(record.email.as_deref(), Some("octocat@github.com"));
        assert_eq!(record.location, None);
        assert_eq!(record.followers_count, 12);
        assert_eq!(record.public_repos_count, 3);
        assert_eq!(record.user_interaction, UserInteraction::Contributor);
    }

    #[test]
    fn test_organizations_field() {
        let mut record = UserRecord::from_profile(profile(None), vec![], UserInteraction::Stargazer);
        assert_eq!(record.organizations_field(), "[]");

        record.organizations = vec!["org-a".to_string()];
        assert_eq!(record.organizations_field(), "['org-a']");

        record.organizations = vec!["org-a".to_string(), "org-b".to_string()];
        assert_eq!(record.organizations_field(), "['org-a', 'org-b']");
    }
}
