//! In-memory view of the destination's projects for a single run.

use crate::types::Project;

/// Outcome of looking an effective project name up in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLookup {
    /// A project with this name was already cached. `None` when the cached
    /// entry is a placeholder.
    Existing(Option<String>),
    /// No project matched; a placeholder was appended.
    Added,
}

impl ProjectLookup {
    /// The destination project id to attach to an entry, if any.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::Existing(id) => id.as_deref(),
            Self::Added => None,
        }
    }
}

/// Ordered, append-only list of destination projects.
///
/// Seeded once from the destination and never re-fetched. Unknown names get a
/// placeholder with an empty id; no project is created remotely.
#[derive(Debug, Clone, Default)]
pub struct ProjectCache {
    projects: Vec<Project>,
}

impl ProjectCache {
    pub const fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Finds `name` by exact match, appending a placeholder when it is absent.
    pub fn lookup_or_insert(&mut self, name: &str) -> ProjectLookup {
        if let Some(project) = self.projects.iter().find(|project| project.name == name) {
            let id = (!project.is_placeholder()).then(|| project.id.clone());
            return ProjectLookup::Existing(id);
        }
        self.projects.push(Project::placeholder(name));
        ProjectLookup::Added
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_project_reuses_id_without_append() {
        let mut cache = ProjectCache::new(vec![Project::new("Work", "id123")]);
        let lookup = cache.lookup_or_insert("Work");
        assert_eq!(lookup, ProjectLookup::Existing(Some("id123".to_string())));
        assert_eq!(lookup.project_id(), Some("id123"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unknown_project_appends_placeholder() {
        let mut cache = ProjectCache::new(vec![Project::new("Work", "id123")]);
        let lookup = cache.lookup_or_insert("NewProj");
        assert_eq!(lookup, ProjectLookup::Added);
        assert_eq!(lookup.project_id(), None);
        assert_eq!(cache.projects()[1], Project::placeholder("NewProj"));
    }

    #[test]
    fn placeholder_is_matched_but_has_no_id() {
        let mut cache = ProjectCache::default();
        assert_eq!(cache.lookup_or_insert("A"), ProjectLookup::Added);
        assert_eq!(cache.lookup_or_insert("A"), ProjectLookup::Existing(None));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn match_is_case_sensitive() {
        let mut cache = ProjectCache::new(vec![Project::new("Work", "id123")]);
        assert_eq!(cache.lookup_or_insert("work"), ProjectLookup::Added);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn first_match_wins_for_duplicate_names() {
        let mut cache = ProjectCache::new(vec![
            Project::new("Work", "first"),
            Project::new("Work", "second"),
        ]);
        assert_eq!(cache.lookup_or_insert("Work").project_id(), Some("first"));
    }
}
