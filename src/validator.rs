//! Structural checks over a finished tree.

use crate::ccf::covers_exactly;
use crate::config::GeneratorConfig;
use crate::generator::GeneratedFaultTree;
use crate::model::GateType;
use crate::registry::{BasicEventId, GateId, HouseEventId, Node};

/// A structural property the tree fails to satisfy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Violation {
    #[error("root gate has parents")]
    RootHasParents,

    #[error("root gate has type {0}, expected and/or")]
    RootType(GateType),

    #[error("gate {0:?} has no parent")]
    OrphanGate(GateId),

    #[error("gate graph has a cycle through {0} gates")]
    Cycle(usize),

    #[error("expected {expected} basic events, found {actual}")]
    BasicEventCount { expected: usize, actual: usize },

    #[error("{gate_type} gate {gate:?} has {children} children")]
    Arity {
        gate: GateId,
        gate_type: GateType,
        children: usize,
    },

    #[error("gate {gate:?} has threshold {k_num:?} with {children} children")]
    Threshold {
        gate: GateId,
        k_num: Option<usize>,
        children: usize,
    },

    #[error("basic event {event:?} has probability {probability} outside the configured range")]
    Probability {
        event: BasicEventId,
        probability: f64,
    },

    #[error("house event {0:?} is not attached to exactly one eligible gate")]
    HouseEventHost(HouseEventId),

    #[error("CCF group {0} has fewer than two members")]
    SmallCcfGroup(String),

    #[error("CCF groups and leftover events do not partition the basic events")]
    CcfPartition,
}

/// Outcome of [`validate_tree`].
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check every structural invariant of `generated` against `config`.
pub fn validate_tree(generated: &GeneratedFaultTree, config: &GeneratorConfig) -> ValidationReport {
    let tree = generated.tree();
    let mut report = ValidationReport::default();
    let violations = &mut report.violations;

    if tree.num_gates() == 0 {
        violations.push(Violation::Cycle(0));
        return report;
    }

    let root = tree.gate(tree.root());
    if !root.parents().is_empty() {
        violations.push(Violation::RootHasParents);
    }
    if !matches!(root.gate_type(), GateType::And | GateType::Or) {
        violations.push(Violation::RootType(root.gate_type()));
    }

    for (id, gate) in tree.gates().skip(1) {
        if gate.parents().is_empty() {
            violations.push(Violation::OrphanGate(id));
        }
    }

    let sorted = tree.topological_order().len();
    if sorted != tree.num_gates() {
        violations.push(Violation::Cycle(tree.num_gates() - sorted));
    }

    if tree.num_basic_events() != config.basics {
        violations.push(Violation::BasicEventCount {
            expected: config.basics,
            actual: tree.num_basic_events(),
        });
    }

    for (id, gate) in tree.gates() {
        let gate_type = gate.gate_type();
        let children = gate.num_children();
        let arity_ok = match gate_type {
            GateType::Not => children == 1,
            GateType::Xor => children == 2,
            GateType::And | GateType::Or | GateType::AtLeast => {
                children >= gate_type.min_children()
            }
        };
        if !arity_ok {
            violations.push(Violation::Arity {
                gate: id,
                gate_type,
                children,
            });
        }

        let threshold_ok = match (gate_type, gate.k_num()) {
            (GateType::AtLeast, Some(k)) => k >= 2 && k < children,
            (GateType::AtLeast, None) => false,
            (_, k) => k.is_none(),
        };
        if !threshold_ok {
            violations.push(Violation::Threshold {
                gate: id,
                k_num: gate.k_num(),
                children,
            });
        }
    }

    let range = config.probability_range();
    for (id, event) in tree.basic_events() {
        if !range.contains(event.probability()) {
            violations.push(Violation::Probability {
                event: id,
                probability: event.probability(),
            });
        }
    }

    for (id, event) in tree.house_events() {
        let eligible = event.num_parents() == 1
            && event.parents().iter().all(|parent| {
                *parent != tree.root() && !tree.gate(*parent).gate_type().is_fixed_arity()
            });
        if !eligible {
            violations.push(Violation::HouseEventHost(id));
        }
    }

    for group in generated.ccf().groups() {
        if group.members().len() < 2 {
            violations.push(Violation::SmallCcfGroup(group.name().to_string()));
        }
    }
    let events: Vec<BasicEventId> = tree.basic_event_ids().collect();
    if !covers_exactly(generated.ccf(), &events) {
        violations.push(Violation::CcfPartition);
    }

    report
}
