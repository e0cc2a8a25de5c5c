//! Bidirectional project name/id index.

use crate::types::ProjectProfile;
use log::warn;
use std::collections::HashMap;

/// Reserved local alias for the server's default project.
pub const INBOX: &str = "inbox";

/// Maps project names to server ids and back.
///
/// Rebuilt from scratch on every sync. The `"inbox"` alias always resolves to
/// the server-reported inbox id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectIndex {
    name_to_id: HashMap<String, String>,
    id_to_name: HashMap<String, String>,
}

impl ProjectIndex {
    /// Build an index from the inbox id and the server's project profiles.
    ///
    /// The inbox alias is seeded first. A name already taken (the alias, or an
    /// earlier profile) keeps its first id; the later project stays reachable
    /// by id, so its tasks still carry its name.
    pub fn build(inbox_id: &str, profiles: &[ProjectProfile]) -> Self {
        let mut index = Self::default();
        index.name_to_id.insert(INBOX.to_string(), inbox_id.to_string());
        index.id_to_name.insert(inbox_id.to_string(), INBOX.to_string());

        for profile in profiles {
            if index.id_to_name.contains_key(&profile.id) {
                warn!("Skipping project '{}' ({}): id already indexed", profile.name, profile.id);
                continue;
            }
            index.id_to_name.insert(profile.id.clone(), profile.name.clone());

            if index.name_to_id.contains_key(&profile.name) {
                warn!(
                    "Project name '{}' is ambiguous; '{}' is only reachable by id",
                    profile.name, profile.id
                );
                continue;
            }
            index.name_to_id.insert(profile.name.clone(), profile.id.clone());
        }

        index
    }

    /// Resolve a project name to its id.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(name).map(String::as_str)
    }

    /// Resolve a project id to its name. Unknown ids give an empty name.
    pub fn resolve_name(&self, id: &str) -> &str {
        self.id_to_name.get(id).map(String::as_str).unwrap_or("")
    }

    /// All known project names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.name_to_id.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }
}
