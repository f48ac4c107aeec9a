//! Plans declared in a thread.

use crate::core::agnostic;
use crate::partition::{PlanDeclaration, normalize_plan};
use crate::reference::ReferenceLabel;
use crate::vote::{Origin, VoteLineBlock};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A registered plan
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub name: String,
    pub label: ReferenceLabel,
    /// The user post that declared it
    pub origin: Origin,
    /// Normalized block: `Plan: <name>` header, no markers
    pub block: VoteLineBlock,
}

/// Result of registering a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanRegistration {
    Registered,
    /// A plan with that name already exists; the first declaration wins
    Duplicate,
    /// The name belongs to another user
    Impersonation,
}

/// Plans by agnostic name, in declaration order
#[derive(Debug, Clone, Default)]
pub struct PlanRegistry {
    plans: Vec<Plan>,
    index: HashMap<String, usize>,
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration found in a post by `origin`.
    ///
    /// `known_users` holds the agnostic names of every author in the thread;
    /// a plan may share a user's name only when that user declared it.
    pub fn register(
        &mut self,
        declaration: &PlanDeclaration,
        origin: &Origin,
        known_users: &HashSet<String>,
    ) -> PlanRegistration {
        let key = agnostic::normalize(&declaration.name);
        if self.index.contains_key(&key) {
            return PlanRegistration::Duplicate;
        }
        if known_users.contains(&key) && key != origin.author_key() {
            return PlanRegistration::Impersonation;
        }

        self.index.insert(key, self.plans.len());
        self.plans.push(Plan {
            name: declaration.name.clone(),
            label: declaration.label,
            origin: origin.clone(),
            block: normalize_plan(&declaration.block, &declaration.name),
        });
        PlanRegistration::Registered
    }

    pub fn get(&self, name: &str) -> Option<&Plan> {
        self.index
            .get(&agnostic::normalize(name))
            .map(|&i| &self.plans[i])
    }

    /// Plans declared in the given post.
    pub fn declared_in(&self, post_id: u64) -> impl Iterator<Item = &Plan> {
        self.plans
            .iter()
            .filter(move |plan| plan.origin.post_id() == post_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::find_declarations;
    use crate::vote::{MarkerType, parse_lines};

    fn declaration(text: &str) -> PlanDeclaration {
        find_declarations(&parse_lines(text), &[]).remove(0)
    }

    fn users(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| agnostic::normalize(n)).collect()
    }

    #[test]
    fn test_register_normalizes() {
        let mut registry = PlanRegistry::new();
        let alice = Origin::new("Alice", 10, 1);
        let outcome = registry.register(
            &declaration("[x] Base Plan: Raid\n-[x] Gather"),
            &alice,
            &users(&["Alice"]),
        );
        assert_eq!(outcome, PlanRegistration::Registered);
        let plan = registry.get("raid").unwrap();
        assert_eq!(plan.block.first().clean_content(), "Plan: Raid");
        assert_eq!(plan.block.marker_type(), MarkerType::None);
        assert_eq!(plan.label, ReferenceLabel::BasePlan);
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut registry = PlanRegistry::new();
        let known = users(&["Alice", "Bob"]);
        registry.register(&declaration("[x] Plan: Raid\n-[x] One"), &Origin::new("Alice", 1, 1), &known);
        let second = registry.register(
            &declaration("[x] Plan: raid\n-[x] Two"),
            &Origin::new("Bob", 2, 2),
            &known,
        );
        assert_eq!(second, PlanRegistration::Duplicate);
        assert_eq!(registry.get("Raid").unwrap().origin.author(), "Alice");
    }

    #[test]
    fn test_user_named_plans() {
        let mut registry = PlanRegistry::new();
        let known = users(&["Alice", "Bob"]);
        let stolen = registry.register(
            &declaration("[x] Plan: Bob\n-[x] Fake"),
            &Origin::new("Alice", 1, 1),
            &known,
        );
        assert_eq!(stolen, PlanRegistration::Impersonation);
        let own = registry.register(
            &declaration("[x] Plan: Bob\n-[x] Real"),
            &Origin::new("Bob", 2, 2),
            &known,
        );
        assert_eq!(own, PlanRegistration::Registered);
    }

    #[test]
    fn test_declared_in() {
        let mut registry = PlanRegistry::new();
        let known = users(&["Alice"]);
        let alice = Origin::new("Alice", 7, 1);
        registry.register(&declaration("[x] Plan: A\n-[x] One"), &alice, &known);
        registry.register(&declaration("[x] Plan: B\n-[x] Two"), &alice, &known);
        assert_eq!(registry.declared_in(7).count(), 2);
        assert_eq!(registry.declared_in(8).count(), 0);
    }
}
