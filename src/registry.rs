//! Arena of fault tree entities addressed by stable integer handles.

use crate::model::GateType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// Handle of a gate. `GateId(0)` is always the root.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GateId(pub u32);

/// Handle of a basic event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BasicEventId(pub u32);

/// Handle of a house event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct HouseEventId(pub u32);

impl GateId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl BasicEventId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl HouseEventId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of any node in the tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum NodeId {
    Gate(GateId),
    BasicEvent(BasicEventId),
    HouseEvent(HouseEventId),
}

impl From<GateId> for NodeId {
    fn from(id: GateId) -> Self {
        NodeId::Gate(id)
    }
}

impl From<BasicEventId> for NodeId {
    fn from(id: BasicEventId) -> Self {
        NodeId::BasicEvent(id)
    }
}

impl From<HouseEventId> for NodeId {
    fn from(id: HouseEventId) -> Self {
        NodeId::HouseEvent(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Gate(id) => write!(f, "Gate({})", id.0),
            NodeId::BasicEvent(id) => write!(f, "BasicEvent({})", id.0),
            NodeId::HouseEvent(id) => write!(f, "HouseEvent({})", id.0),
        }
    }
}

/// Capabilities shared by gates, basic events and house events.
pub trait Node {
    fn name(&self) -> &str;

    /// Gates that have this node as a child.
    fn parents(&self) -> &BTreeSet<GateId>;

    fn num_parents(&self) -> usize {
        self.parents().len()
    }

    /// A node is shared when it appears under more than one gate.
    fn is_shared(&self) -> bool {
        self.parents().len() > 1
    }
}

/// Internal node combining its children with a logical operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    name: String,
    gate_type: GateType,
    k_num: Option<usize>,
    parents: BTreeSet<GateId>,
    gates: BTreeSet<GateId>,
    basic_events: BTreeSet<BasicEventId>,
    house_events: BTreeSet<HouseEventId>,
}

impl Gate {
    fn new(name: String, gate_type: GateType) -> Self {
        Self {
            name,
            gate_type,
            k_num: None,
            parents: BTreeSet::new(),
            gates: BTreeSet::new(),
            basic_events: BTreeSet::new(),
            house_events: BTreeSet::new(),
        }
    }

    pub fn gate_type(&self) -> GateType {
        self.gate_type
    }

    /// Threshold of an ATLEAST gate.
    pub fn k_num(&self) -> Option<usize> {
        self.k_num
    }

    pub fn gates(&self) -> &BTreeSet<GateId> {
        &self.gates
    }

    pub fn basic_events(&self) -> &BTreeSet<BasicEventId> {
        &self.basic_events
    }

    pub fn house_events(&self) -> &BTreeSet<HouseEventId> {
        &self.house_events
    }

    pub fn num_children(&self) -> usize {
        self.gates.len() + self.basic_events.len() + self.house_events.len()
    }

    pub fn has_children(&self) -> bool {
        self.num_children() > 0
    }

    /// Children in partition order: gates, basic events, house events.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.gates
            .iter()
            .map(|&id| NodeId::Gate(id))
            .chain(self.basic_events.iter().map(|&id| NodeId::BasicEvent(id)))
            .chain(self.house_events.iter().map(|&id| NodeId::HouseEvent(id)))
    }

    pub fn has_child(&self, child: NodeId) -> bool {
        match child {
            NodeId::Gate(id) => self.gates.contains(&id),
            NodeId::BasicEvent(id) => self.basic_events.contains(&id),
            NodeId::HouseEvent(id) => self.house_events.contains(&id),
        }
    }
}

impl Node for Gate {
    fn name(&self) -> &str {
        &self.name
    }

    fn parents(&self) -> &BTreeSet<GateId> {
        &self.parents
    }
}

/// Leaf with a failure probability.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicEvent {
    name: String,
    probability: f64,
    parents: BTreeSet<GateId>,
}

impl BasicEvent {
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Node for BasicEvent {
    fn name(&self) -> &str {
        &self.name
    }

    fn parents(&self) -> &BTreeSet<GateId> {
        &self.parents
    }
}

/// Leaf with a constant boolean state.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseEvent {
    name: String,
    state: bool,
    parents: BTreeSet<GateId>,
}

impl HouseEvent {
    pub fn state(&self) -> bool {
        self.state
    }
}

impl Node for HouseEvent {
    fn name(&self) -> &str {
        &self.name
    }

    fn parents(&self) -> &BTreeSet<GateId> {
        &self.parents
    }
}

/// Registry owning every entity of one generated fault tree.
///
/// Names are sequential per kind: gates `G0, G1, ...`, basic events
/// `E1, E2, ...`, house events `H1, H2, ...`. Entities are never removed, so
/// handles stay valid for the lifetime of the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaultTree {
    gates: Vec<Gate>,
    basic_events: Vec<BasicEvent>,
    house_events: Vec<HouseEvent>,
}

impl FaultTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root gate, the first gate ever created.
    pub fn root(&self) -> GateId {
        GateId(0)
    }

    pub fn gate(&self, id: GateId) -> &Gate {
        &self.gates[id.index()]
    }

    pub fn basic_event(&self, id: BasicEventId) -> &BasicEvent {
        &self.basic_events[id.index()]
    }

    pub fn house_event(&self, id: HouseEventId) -> &HouseEvent {
        &self.house_events[id.index()]
    }

    /// Look up any node through its [`Node`] capabilities.
    pub fn node(&self, id: NodeId) -> &dyn Node {
        match id {
            NodeId::Gate(id) => self.gate(id),
            NodeId::BasicEvent(id) => self.basic_event(id),
            NodeId::HouseEvent(id) => self.house_event(id),
        }
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn num_basic_events(&self) -> usize {
        self.basic_events.len()
    }

    pub fn num_house_events(&self) -> usize {
        self.house_events.len()
    }

    pub fn gate_ids(&self) -> impl ExactSizeIterator<Item = GateId> {
        (0..self.gates.len() as u32).map(GateId)
    }

    pub fn basic_event_ids(&self) -> impl ExactSizeIterator<Item = BasicEventId> {
        (0..self.basic_events.len() as u32).map(BasicEventId)
    }

    pub fn house_event_ids(&self) -> impl ExactSizeIterator<Item = HouseEventId> {
        (0..self.house_events.len() as u32).map(HouseEventId)
    }

    pub fn gates(&self) -> impl Iterator<Item = (GateId, &Gate)> {
        self.gate_ids().zip(&self.gates)
    }

    pub fn basic_events(&self) -> impl Iterator<Item = (BasicEventId, &BasicEvent)> {
        self.basic_event_ids().zip(&self.basic_events)
    }

    pub fn house_events(&self) -> impl Iterator<Item = (HouseEventId, &HouseEvent)> {
        self.house_event_ids().zip(&self.house_events)
    }

    /// Create a gate named `G<n>`, optionally under `parent`.
    pub fn add_gate(&mut self, gate_type: GateType, parent: Option<GateId>) -> GateId {
        let id = GateId(self.gates.len() as u32);
        self.gates
            .push(Gate::new(format!("G{}", self.gates.len()), gate_type));
        if let Some(parent) = parent {
            self.add_child(parent, id.into());
        }
        id
    }

    /// Create a basic event named `E<n>` under `parent`.
    pub fn add_basic_event(&mut self, probability: f64, parent: GateId) -> BasicEventId {
        let id = BasicEventId(self.basic_events.len() as u32);
        self.basic_events.push(BasicEvent {
            name: format!("E{}", self.basic_events.len() + 1),
            probability,
            parents: BTreeSet::new(),
        });
        self.add_child(parent, id.into());
        id
    }

    /// Create a house event named `H<n>` under `parent`.
    pub fn add_house_event(&mut self, state: bool, parent: GateId) -> HouseEventId {
        let id = HouseEventId(self.house_events.len() as u32);
        self.house_events.push(HouseEvent {
            name: format!("H{}", self.house_events.len() + 1),
            state,
            parents: BTreeSet::new(),
        });
        self.add_child(parent, id.into());
        id
    }

    /// Link `child` under `gate` and register `gate` as its parent.
    ///
    /// Returns `false` if the link already existed.
    pub fn add_child(&mut self, gate: GateId, child: NodeId) -> bool {
        match child {
            NodeId::Gate(id) => {
                self.gates[id.index()].parents.insert(gate);
                self.gates[gate.index()].gates.insert(id)
            }
            NodeId::BasicEvent(id) => {
                self.basic_events[id.index()].parents.insert(gate);
                self.gates[gate.index()].basic_events.insert(id)
            }
            NodeId::HouseEvent(id) => {
                self.house_events[id.index()].parents.insert(gate);
                self.gates[gate.index()].house_events.insert(id)
            }
        }
    }

    pub(crate) fn set_k_num(&mut self, gate: GateId, k_num: Option<usize>) {
        self.gates[gate.index()].k_num = k_num;
    }

    pub(crate) fn rename_gate(&mut self, gate: GateId, name: impl Into<String>) {
        self.gates[gate.index()].name = name.into();
    }

    /// Transitive closure of the parent relation, including `gate` itself.
    ///
    /// Attaching any gate of this set under `gate` would create a cycle.
    pub fn ancestors(&self, gate: GateId) -> BTreeSet<GateId> {
        let mut ancestors = BTreeSet::from([gate]);
        let mut queue: VecDeque<GateId> = self.gate(gate).parents.iter().copied().collect();
        while let Some(parent) = queue.pop_front() {
            if ancestors.insert(parent) {
                queue.extend(self.gate(parent).parents.iter().copied());
            }
        }
        ancestors
    }

    /// Gates ordered so that every gate precedes all of its gate children.
    ///
    /// Uses Kahn's algorithm starting from the parentless gates; gates that
    /// sit on a cycle are left out, so a complete order also proves acyclicity.
    pub fn topological_order(&self) -> Vec<GateId> {
        let mut in_degree: Vec<usize> = self.gates.iter().map(|g| g.parents.len()).collect();

        let mut queue: VecDeque<GateId> = self
            .gate_ids()
            .filter(|id| in_degree[id.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.gates.len());

        while let Some(gate_id) = queue.pop_front() {
            order.push(gate_id);

            for &child in &self.gate(gate_id).gates {
                let deg = &mut in_degree[child.index()];
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(child);
                }
            }
        }

        order
    }
}
