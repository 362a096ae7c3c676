//! Common-cause-failure groups carved out of the finished basic events.

use crate::distribution::ProbabilityRange;
use crate::registry::BasicEventId;
use crate::tracer::Tracer;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Model tag written for every group.
pub const CCF_MODEL: &str = "MGL";

/// Range of the per-level factors.
const FACTOR_RANGE: ProbabilityRange = ProbabilityRange::new(0.1, 1.0);

/// Basic events that fail together through a shared mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcfGroup {
    name: String,
    members: Vec<BasicEventId>,
    probability: f64,
    factors: Vec<f64>,
}

impl CcfGroup {
    /// Sequential name: `CCF1`, `CCF2`, ...
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[BasicEventId] {
        &self.members
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn model(&self) -> &'static str {
        CCF_MODEL
    }

    /// Factors for levels `2..=levels()`, in level order.
    pub fn factors(&self) -> &[f64] {
        &self.factors
    }

    pub fn levels(&self) -> usize {
        self.factors.len() + 1
    }
}

/// Partition of the basic events into CCF groups and the remaining events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CcfAssignment {
    groups: Vec<CcfGroup>,
    non_ccf_events: Vec<BasicEventId>,
}

impl CcfAssignment {
    /// Assignment without groups: every event is left over.
    pub fn ungrouped(events: impl IntoIterator<Item = BasicEventId>) -> Self {
        Self {
            groups: Vec::new(),
            non_ccf_events: events.into_iter().collect(),
        }
    }

    pub fn groups(&self) -> &[CcfGroup] {
        &self.groups
    }

    /// Basic events that belong to no group.
    pub fn non_ccf_events(&self) -> &[BasicEventId] {
        &self.non_ccf_events
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Whether `event` is a member of some group.
    pub fn is_grouped(&self, event: BasicEventId) -> bool {
        self.groups.iter().any(|g| g.members.contains(&event))
    }
}

/// Carve up to `num_groups` groups out of `events`.
///
/// Events are shuffled, then consecutive slices of random size in
/// `[2, floor(2 * avg_children - 2)]` become groups. A slice is clamped to
/// the events still available; assignment stops early when fewer than two
/// remain.
pub fn assign_ccf_groups<R: Rng, T: Tracer>(
    events: &[BasicEventId],
    num_groups: usize,
    avg_children: f64,
    probability: ProbabilityRange,
    rng: &mut R,
    tracer: &T,
) -> CcfAssignment {
    if num_groups == 0 {
        return CcfAssignment::ungrouped(events.iter().copied());
    }

    let mut pool = events.to_vec();
    pool.shuffle(rng);

    let max_size = ((2.0 * avg_children - 2.0).floor() as usize).max(2);
    let mut groups = Vec::with_capacity(num_groups);
    let mut first = 0;

    while groups.len() < num_groups && pool.len() - first >= 2 {
        let size = rng.gen_range(2..=max_size).min(pool.len() - first);
        let members = pool[first..first + size].to_vec();
        first += size;

        let name = format!("CCF{}", groups.len() + 1);
        let group_probability = probability.sample(rng);
        let levels = rng.gen_range(2..=size);
        let factors = (1..levels).map(|_| FACTOR_RANGE.sample(rng)).collect();

        tracer.on_ccf_group_created(&name, size);
        groups.push(CcfGroup {
            name,
            members,
            probability: group_probability,
            factors,
        });
    }

    CcfAssignment {
        groups,
        non_ccf_events: pool.split_off(first),
    }
}

/// Check that groups and leftovers cover `events` exactly once.
pub(crate) fn covers_exactly(assignment: &CcfAssignment, events: &[BasicEventId]) -> bool {
    let mut seen = BTreeSet::new();
    let members = assignment
        .groups
        .iter()
        .flat_map(|g| g.members.iter())
        .chain(&assignment.non_ccf_events);
    for member in members {
        if !seen.insert(*member) {
            return false;
        }
    }
    seen.len() == events.len() && events.iter().all(|e| seen.contains(e))
}
