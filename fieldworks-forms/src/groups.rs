//! Field groups: named, ordered sections of a form.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A section of a rendered form.
///
/// Collapsible groups render as a disclosure widget, initially closed when
/// `collapsed` is set; other groups render as a fieldset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldGroup {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: u32,
    pub collapsible: bool,
    pub collapsed: bool,
    /// Member field names, in display order
    pub fields: Vec<String>,
}

impl Default for FieldGroup {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            priority: 10,
            collapsible: true,
            collapsed: false,
            fields: Vec::new(),
        }
    }
}

impl FieldGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }
}

/// Groups keyed by id, listed by priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSet {
    groups: Vec<FieldGroup>,
}

impl GroupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group. Returns false, keeping the existing group, if the id is
    /// taken.
    pub fn register(&mut self, group: FieldGroup) -> bool {
        if self.contains(&group.id) {
            warn!(id = %group.id, "field group already registered");
            return false;
        }
        self.groups.push(group);
        true
    }

    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|group| group.id != id);
        self.groups.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&FieldGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Groups by ascending priority; equal priorities keep registration order.
    pub fn list(&self) -> Vec<&FieldGroup> {
        let mut groups: Vec<&FieldGroup> = self.groups.iter().collect();
        groups.sort_by_key(|group| group.priority);
        groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut set = GroupSet::new();
        assert!(set.register(FieldGroup::new("contact", "Contact")));
        assert!(!set.register(FieldGroup::new("contact", "Other")));
        assert_eq!(set.get("contact").unwrap().title, "Contact");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn list_is_stable_by_priority() {
        let mut set = GroupSet::new();
        set.register(FieldGroup::new("b", "B").priority(20));
        set.register(FieldGroup::new("a", "A").priority(5));
        set.register(FieldGroup::new("c", "C").priority(20));
        let ids: Vec<_> = set.list().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        assert!(set.unregister("b"));
        assert!(!set.unregister("b"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn groups_deserialize_with_defaults() {
        let group: FieldGroup =
            serde_yaml_ng::from_str("id: media\ntitle: Media\nfields: [logo, photos]\n").unwrap();
        assert_eq!(group.priority, 10);
        assert!(group.collapsible);
        assert!(!group.collapsed);
        assert_eq!(group.fields, vec!["logo", "photos"]);
    }
}
