//! Required status checks: evaluation and polling
//!
//! - [`evaluate`]: pure functions over a sample of check runs
//! - [`poller`]: waits until every required check has finished

pub mod evaluate;
pub mod poller;

pub use evaluate::{CheckSummary, summarize};
pub use poller::{CheckSuitePoller, PollError, PollReport, PollSettings};

/// The check names a branch's protection rules require
///
/// Read once per run; order is preserved and duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredCheckSet {
    names: Vec<String>,
}

impl RequiredCheckSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for name in names {
            let name = name.into();
            if !set.names.contains(&name) {
                set.names.push(name);
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
