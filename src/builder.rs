//! Breadth-first construction of the gate graph.
//!
//! Gates wait in a FIFO queue until they are expanded. Expanding a gate
//! samples its target child count and then adds children one at a time: fresh
//! or reused gates, fresh or reused basic events. Fresh gates join the back of
//! the queue. When the queue runs dry before the basic event budget is spent,
//! a new gate is grown under a random variable-arity gate and construction
//! resumes.

use crate::distribution::{coin, ProbabilityRange};
use crate::model::{ComplexityModel, GateType};
use crate::registry::{BasicEventId, FaultTree, GateId, NodeId};
use crate::tracer::Tracer;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, VecDeque};

/// Grows a [`FaultTree`] until it holds exactly `num_basics` basic events.
pub struct TreeBuilder<'a, R: Rng, T: Tracer> {
    model: &'a ComplexityModel,
    rng: &'a mut R,
    tracer: &'a T,
    probability: ProbabilityRange,
    num_basics: usize,
    tree: FaultTree,
    queue: VecDeque<GateId>,
}

impl<'a, R: Rng, T: Tracer> TreeBuilder<'a, R, T> {
    pub fn new(
        model: &'a ComplexityModel,
        rng: &'a mut R,
        tracer: &'a T,
        probability: ProbabilityRange,
        num_basics: usize,
    ) -> Self {
        Self {
            model,
            rng,
            tracer,
            probability,
            num_basics,
            tree: FaultTree::new(),
            queue: VecDeque::new(),
        }
    }

    /// Build the gate graph under a root gate named `root_name`.
    pub fn build(mut self, root_name: &str) -> FaultTree {
        let root = self.create_root(root_name);
        self.queue.push_back(root);

        loop {
            while let Some(gate) = self.queue.pop_front() {
                self.expand_gate(gate);
            }
            if self.budget_exhausted() {
                break;
            }
            self.correct_starvation();
        }

        self.tree
    }

    fn budget_exhausted(&self) -> bool {
        self.tree.num_basic_events() >= self.num_basics
    }

    /// The root only takes AND or OR so the tree stays decomposable.
    fn create_root(&mut self, root_name: &str) -> GateId {
        let gate_type = loop {
            let sampled = self.model.sample_gate_type(self.rng);
            if matches!(sampled, GateType::And | GateType::Or) {
                break sampled;
            }
        };
        let root = self.tree.add_gate(gate_type, None);
        self.tree.rename_gate(root, root_name);
        self.tracer.on_gate_created(root, gate_type, None);
        root
    }

    fn create_gate(&mut self, parent: GateId) -> GateId {
        let gate_type = self.model.sample_gate_type(self.rng);
        let gate = self.tree.add_gate(gate_type, Some(parent));
        self.tracer.on_gate_created(gate, gate_type, Some(parent));
        self.queue.push_back(gate);
        gate
    }

    fn create_basic_event(&mut self, parent: GateId) -> BasicEventId {
        let probability = self.probability.sample(self.rng);
        let event = self.tree.add_basic_event(probability, parent);
        self.tracer.on_basic_event_created(event, parent);
        event
    }

    fn reuse(&mut self, parent: GateId, child: NodeId) {
        if self.tree.add_child(parent, child) {
            self.tracer.on_node_reused(parent, child);
        }
    }

    fn expand_gate(&mut self, gate: GateId) {
        let gate_type = self.tree.gate(gate).gate_type();
        let count = self.model.sample_child_count(gate_type, self.rng);
        self.tree.set_k_num(gate, count.k_num);
        self.tracer.on_child_target(gate, count.children);

        let mut target = count.children;
        let mut ancestors: Option<BTreeSet<GateId>> = None;
        let max_trials = self.tree.num_gates();

        while self.tree.gate(gate).num_children() < target {
            if self.budget_exhausted() {
                if !self.reuse_spare_basic_event(gate) {
                    target = self.truncate_target(gate, target);
                }
                continue;
            }

            let gate_child = self.model.choose_gate_child(self.rng);
            let s_reuse: f64 = self.rng.gen();

            if gate_child {
                if s_reuse < self.model.common_g() {
                    let ancestors = ancestors.get_or_insert_with(|| self.tree.ancestors(gate));
                    if let Some(candidate) =
                        pick_reusable_gate(&self.tree, gate, ancestors, max_trials, self.rng)
                    {
                        self.reuse(gate, candidate.into());
                    } else {
                        self.tracer.on_gate_reuse_failed(gate, max_trials);
                    }
                } else {
                    self.create_gate(gate);
                }
            } else if s_reuse < self.model.common_b() && self.tree.num_basic_events() > 0 {
                let event = BasicEventId(self.rng.gen_range(0..self.tree.num_basic_events() as u32));
                self.reuse(gate, event.into());
            } else {
                self.create_basic_event(gate);
            }
        }
    }

    /// Attach a random basic event that is not yet a child of `gate`.
    ///
    /// Returns `false` if every basic event already is one.
    fn reuse_spare_basic_event(&mut self, gate: GateId) -> bool {
        let num_events = self.tree.num_basic_events();
        let children = self.tree.gate(gate).basic_events();
        if children.len() >= num_events {
            return false;
        }
        // At least one draw in `num_events` hits a spare event.
        let event = loop {
            let candidate = BasicEventId(self.rng.gen_range(0..num_events as u32));
            if !children.contains(&candidate) {
                break candidate;
            }
        };
        self.reuse(gate, event.into());
        true
    }

    /// Accept the current children as the gate's target.
    ///
    /// Validation guarantees the budget covers the minimum arity of every
    /// enabled gate type, so the realized count never drops below it.
    fn truncate_target(&mut self, gate: GateId, target: usize) -> usize {
        let node = self.tree.gate(gate);
        let realized = node.num_children();
        if let Some(k_num) = node.k_num() {
            let clamped = k_num.min(realized.saturating_sub(1)).max(2);
            self.tree.set_k_num(gate, Some(clamped));
        }
        self.tracer.on_target_truncated(gate, target, realized);
        realized
    }

    /// Grow a fresh gate under a random gate that can take more children.
    fn correct_starvation(&mut self) {
        let hosts: Vec<GateId> = self
            .tree
            .gates()
            .filter(|(_, g)| !g.gate_type().is_fixed_arity())
            .map(|(id, _)| id)
            .collect();
        // The root is AND or OR, so `hosts` is never empty.
        let host = hosts.choose(self.rng).copied().unwrap_or(self.tree.root());
        let new_gate = self.create_gate(host);
        let missing = self.num_basics - self.tree.num_basic_events();
        self.tracer.on_starvation_correction(host, new_gate, missing);
    }
}

/// Draw random gates until one can be attached under `gate` without a cycle.
///
/// A candidate is accepted if it is not already a child, is not `gate`
/// itself, and is either childless or outside `ancestors`.
fn pick_reusable_gate<R: Rng>(
    tree: &FaultTree,
    gate: GateId,
    ancestors: &BTreeSet<GateId>,
    max_trials: usize,
    rng: &mut R,
) -> Option<GateId> {
    let num_gates = tree.num_gates() as u32;
    let children = tree.gate(gate).gates();
    (0..max_trials).find_map(|_| {
        let candidate = GateId(rng.gen_range(0..num_gates));
        if candidate == gate || children.contains(&candidate) {
            return None;
        }
        let safe = !tree.gate(candidate).has_children() || !ancestors.contains(&candidate);
        safe.then_some(candidate)
    })
}

/// Attach `count` house events to random gates that are neither the root nor
/// NOT/XOR gates.
///
/// Hosts are distinct while unused eligible gates remain; after that they are
/// drawn uniformly from all eligible gates. Returns `false` without attaching
/// anything if no such gate exists.
pub fn distribute_house_events<R: Rng, T: Tracer>(
    tree: &mut FaultTree,
    count: usize,
    rng: &mut R,
    tracer: &T,
) -> bool {
    if count == 0 {
        return true;
    }
    let root = tree.root();
    let mut hosts: Vec<GateId> = tree
        .gates()
        .filter(|(id, g)| *id != root && !g.gate_type().is_fixed_arity())
        .map(|(id, _)| id)
        .collect();
    if hosts.is_empty() {
        return false;
    }
    hosts.shuffle(rng);
    for i in 0..count {
        let host = match hosts.get(i) {
            Some(&host) => host,
            None => hosts[rng.gen_range(0..hosts.len())],
        };
        let event = tree.add_house_event(coin(rng, 0.5), host);
        tracer.on_house_event_created(event, host);
    }
    true
}
