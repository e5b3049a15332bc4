//! Repository coordinates on GitHub

use crate::github::parse_github_url;
use std::fmt;
use std::str::FromStr;

/// `owner/name` of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Derive the slug from a git remote URL
    pub fn from_remote_url(url: &str) -> Option<Self> {
        parse_github_url(url).map(|(owner, name)| Self::new(owner, name))
    }
}

impl FromStr for RepoSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(format!("expected owner/name, got '{s}'")),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slug() {
        let slug: RepoSlug = "octo/widgets".parse().unwrap();
        assert_eq!(slug, RepoSlug::new("octo", "widgets"));
        assert_eq!(slug.to_string(), "octo/widgets");
    }

    #[test]
    fn test_parse_invalid_slug() {
        assert!("octo".parse::<RepoSlug>().is_err());
        assert!("/widgets".parse::<RepoSlug>().is_err());
        assert!("octo/".parse::<RepoSlug>().is_err());
        assert!("a/b/c".parse::<RepoSlug>().is_err());
    }

    #[test]
    fn test_from_remote_url() {
        assert_eq!(
            RepoSlug::from_remote_url("git@github.com:octo/widgets.git"),
            Some(RepoSlug::new("octo", "widgets"))
        );
        assert_eq!(RepoSlug::from_remote_url("/srv/git/widgets"), None);
    }
}
