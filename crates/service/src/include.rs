//! Explicit relation hydration for read operations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A relation a read may hydrate. Hydration is one level deep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    /// User -> todos
    Todos,
    /// User -> habits
    Habits,
    /// User -> deadlines
    Deadlines,
    /// Todo/Habit/Deadline -> owning user summary
    Owner,
    /// UserOnExercise -> exercise
    Exercise,
    /// Exercise -> associated UserOnExercise rows
    Performers,
}

/// The set of relations a read should hydrate; anything absent comes back empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Include(BTreeSet<Relation>);

impl Include {
    pub fn none() -> Self { Self::default() }

    pub fn of(relations: impl IntoIterator<Item = Relation>) -> Self {
        Self(relations.into_iter().collect())
    }

    /// Todos, habits and deadlines of a user.
    pub fn user_children() -> Self {
        Self::of([Relation::Todos, Relation::Habits, Relation::Deadlines])
    }

    pub fn contains(&self, relation: Relation) -> bool { self.0.contains(&relation) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_children_excludes_other_relations() {
        let inc = Include::user_children();
        assert!(inc.contains(Relation::Todos) && inc.contains(Relation::Habits) && inc.contains(Relation::Deadlines));
        assert!(!inc.contains(Relation::Owner));
        assert!(Include::none().is_empty());
    }

    #[test]
    fn deserializes_from_relation_names() {
        let inc: Include = serde_json::from_str(r#"["owner", "performers", "owner"]"#).unwrap();
        assert_eq!(inc, Include::of([Relation::Owner, Relation::Performers]));
    }
}
