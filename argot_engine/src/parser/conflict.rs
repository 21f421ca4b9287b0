use std::collections::{HashMap, HashSet};

/// A mutually exclusive group of declared specs (by index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExclusiveGroup {
    required: bool,
    members: Vec<usize>,
}

impl ExclusiveGroup {
    pub(crate) fn new(required: bool, members: Vec<usize>) -> Self {
        Self { required, members }
    }

    pub(crate) fn required(&self) -> bool {
        self.required
    }

    pub(crate) fn members(&self) -> &[usize] {
        &self.members
    }
}

/// The symmetric "not allowed with" relation derived from the exclusive groups.
#[derive(Debug, Default)]
pub(crate) struct ConflictRegistry {
    groups: Vec<ExclusiveGroup>,
    conflicts: HashMap<usize, Vec<usize>>,
}

impl ConflictRegistry {
    pub(crate) fn new(groups: Vec<ExclusiveGroup>) -> Self {
        let mut conflicts: HashMap<usize, Vec<usize>> = HashMap::default();

        for group in &groups {
            for member in &group.members {
                let others = conflicts.entry(*member).or_default();

                for other in &group.members {
                    if other != member && !others.contains(other) {
                        others.push(*other);
                    }
                }
            }
        }

        Self { groups, conflicts }
    }

    pub(crate) fn groups(&self) -> &[ExclusiveGroup] {
        &self.groups
    }

    /// The first spec in `seen` that `spec` is not allowed with.
    pub(crate) fn conflict(&self, spec: usize, seen: &HashSet<usize>) -> Option<usize> {
        self.conflicts
            .get(&spec)?
            .iter()
            .find(|other| seen.contains(other))
            .copied()
    }

    /// The required groups with no member in `seen`.
    pub(crate) fn unsatisfied<'a>(
        &'a self,
        seen: &'a HashSet<usize>,
    ) -> impl Iterator<Item = &'a ExclusiveGroup> + 'a {
        self.groups
            .iter()
            .filter(move |group| group.required && !group.members.iter().any(|m| seen.contains(m)))
    }
}
