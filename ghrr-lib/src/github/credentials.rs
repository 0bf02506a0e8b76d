use crate::Result;
use core::fmt::{Debug, Formatter};
use ohno::bail;

/// GitHub identity and access token used to authenticate every API call.
///
/// Built once at the entry point and handed down explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    token: String,
}

impl Credentials {
    /// Validate and bundle the user and token.
    ///
    /// Both values must be present and non-empty.
    pub fn new(user: Option<&str>, token: Option<&str>) -> Result<Self> {
        let user = user.map(str::trim).unwrap_or_default();
        if user.is_empty() {
            bail!("Please add GITHUB_USER environment variable");
        }

        let token = token.map(str::trim).unwrap_or_default();
        if token.is_empty() {
            bail!("Please add GITHUB_TOKEN environment variable");
        }

        Ok(Self {
            user: user.to_string(),
            token: token.to_string(),
        })
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}
