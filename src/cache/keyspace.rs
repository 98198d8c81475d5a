//! Group classification and composite key resolution.
//!
//! Every backend addresses entries by a composite key built from the caller's
//! key, the group the entry lives in and the current site/network scope:
//!
//! | group class | composite key              |
//! |-------------|----------------------------|
//! | global      | `key`                      |
//! | network     | `network{network_id}_key`  |
//! | site        | `site{site_id}_key`        |

use std::collections::HashSet;

use crate::config::Settings;

/// One group name or a list of them.
///
/// Accepted wherever groups are classified, so callers can pass `"posts"`,
/// `["posts", "terms"]` or a `Vec<String>` alike.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupList(Vec<String>);

impl GroupList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for GroupList {
    fn from(group: &str) -> Self {
        Self(vec![group.to_string()])
    }
}

impl From<String> for GroupList {
    fn from(group: String) -> Self {
        Self(vec![group])
    }
}

impl<S: AsRef<str>> From<Vec<S>> for GroupList {
    fn from(groups: Vec<S>) -> Self {
        Self(groups.iter().map(|g| g.as_ref().to_string()).collect())
    }
}

impl<S: AsRef<str>> From<&[S]> for GroupList {
    fn from(groups: &[S]) -> Self {
        Self(groups.iter().map(|g| g.as_ref().to_string()).collect())
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for GroupList {
    fn from(groups: [S; N]) -> Self {
        Self(groups.iter().map(|g| g.as_ref().to_string()).collect())
    }
}

/// Current scope plus group classification for one backend.
#[derive(Debug, Clone)]
pub struct Keyspace {
    site_id: u64,
    network_id: u64,
    global_groups: HashSet<String>,
    network_groups: HashSet<String>,
}

impl Keyspace {
    /// Starts in the site and network named by `settings`, with no classified groups.
    pub fn new(settings: &Settings) -> Self {
        Self {
            site_id: settings.site_id,
            network_id: settings.network_id,
            global_groups: HashSet::new(),
            network_groups: HashSet::new(),
        }
    }

    pub fn site_id(&self) -> u64 {
        self.site_id
    }

    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    pub fn switch_to_site(&mut self, site_id: u64) {
        self.site_id = site_id;
    }

    pub fn switch_to_network(&mut self, network_id: u64) {
        self.network_id = network_id;
    }

    pub fn add_global_groups(&mut self, groups: &[String]) {
        self.global_groups.extend(groups.iter().cloned());
    }

    pub fn add_network_groups(&mut self, groups: &[String]) {
        self.network_groups.extend(groups.iter().cloned());
    }

    pub fn is_global(&self, group: &str) -> bool {
        self.global_groups.contains(group)
    }

    pub fn is_network(&self, group: &str) -> bool {
        self.network_groups.contains(group)
    }

    /// Resolves the composite key for `key` in `group`.
    ///
    /// Global classification is checked before network classification.
    pub fn composite_key(&self, key: &str, group: &str) -> String {
        if self.is_global(group) {
            key.to_string()
        } else if self.is_network(group) {
            format!("network{}_{key}", self.network_id)
        } else {
            format!("site{}_{key}", self.site_id)
        }
    }
}

/// Set of groups kept out of durable storage.
#[derive(Debug, Clone, Default)]
pub struct NonPersistentGroups(HashSet<String>);

impl NonPersistentGroups {
    pub fn add(&mut self, groups: &[String]) {
        self.0.extend(groups.iter().cloned());
    }

    pub fn contains(&self, group: &str) -> bool {
        self.0.contains(group)
    }
}
