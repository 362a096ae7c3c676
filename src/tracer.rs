//! Tracer trait for observing fault tree generation.
//!
//! The default [`NoopTracer`] costs nothing. [`EventCollector`] records every
//! event for assertions in tests, and [`LogTracer`] (feature `tracing`)
//! forwards events to the `tracing` crate.
//!
//! # Example
//!
//! ```
//! use fault_tree_gen::{EventCollector, FaultTreeGenerator, GenerationEvent, GeneratorConfig};
//! use std::sync::Arc;
//!
//! let collector = Arc::new(EventCollector::new());
//! let generator =
//!     FaultTreeGenerator::with_tracer(GeneratorConfig::minimal(), collector.clone()).unwrap();
//! let generated = generator.generate().unwrap();
//!
//! let created = collector
//!     .events()
//!     .iter()
//!     .filter(|e| matches!(e, GenerationEvent::BasicEventCreated { .. }))
//!     .count();
//! assert_eq!(created, generated.tree().num_basic_events());
//! ```

use crate::model::GateType;
use crate::registry::{BasicEventId, GateId, HouseEventId, NodeId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Observer of generation decisions.
///
/// All methods have empty default implementations, so implementors only
/// override the events they care about.
pub trait Tracer: Send + Sync + 'static {
    /// A gate was created; `parent` is `None` for the root.
    #[inline]
    fn on_gate_created(&self, _gate: GateId, _gate_type: GateType, _parent: Option<GateId>) {}

    /// A fresh basic event was created under `parent`.
    #[inline]
    fn on_basic_event_created(&self, _event: BasicEventId, _parent: GateId) {}

    /// The child count `target` was sampled for `gate` when it was expanded.
    #[inline]
    fn on_child_target(&self, _gate: GateId, _target: usize) {}

    /// An existing node was attached under `parent`.
    #[inline]
    fn on_node_reused(&self, _parent: GateId, _child: NodeId) {}

    /// No cycle-safe gate was found for reuse within `trials` draws.
    #[inline]
    fn on_gate_reuse_failed(&self, _gate: GateId, _trials: usize) {}

    /// Every basic event was already a child, so the target was lowered.
    #[inline]
    fn on_target_truncated(&self, _gate: GateId, _target: usize, _realized: usize) {}

    /// The queue ran dry with `missing` basic events still to create.
    #[inline]
    fn on_starvation_correction(&self, _host: GateId, _new_gate: GateId, _missing: usize) {}

    /// A house event was attached under `parent`.
    #[inline]
    fn on_house_event_created(&self, _event: HouseEventId, _parent: GateId) {}

    /// A CCF group was formed.
    #[inline]
    fn on_ccf_group_created(&self, _name: &str, _size: usize) {}
}

/// Tracer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {}

impl<T: Tracer> Tracer for Arc<T> {
    fn on_gate_created(&self, gate: GateId, gate_type: GateType, parent: Option<GateId>) {
        (**self).on_gate_created(gate, gate_type, parent);
    }

    fn on_basic_event_created(&self, event: BasicEventId, parent: GateId) {
        (**self).on_basic_event_created(event, parent);
    }

    fn on_child_target(&self, gate: GateId, target: usize) {
        (**self).on_child_target(gate, target);
    }

    fn on_node_reused(&self, parent: GateId, child: NodeId) {
        (**self).on_node_reused(parent, child);
    }

    fn on_gate_reuse_failed(&self, gate: GateId, trials: usize) {
        (**self).on_gate_reuse_failed(gate, trials);
    }

    fn on_target_truncated(&self, gate: GateId, target: usize, realized: usize) {
        (**self).on_target_truncated(gate, target, realized);
    }

    fn on_starvation_correction(&self, host: GateId, new_gate: GateId, missing: usize) {
        (**self).on_starvation_correction(host, new_gate, missing);
    }

    fn on_house_event_created(&self, event: HouseEventId, parent: GateId) {
        (**self).on_house_event_created(event, parent);
    }

    fn on_ccf_group_created(&self, name: &str, size: usize) {
        (**self).on_ccf_group_created(name, size);
    }
}

/// Recorded generation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GenerationEvent {
    GateCreated {
        gate: GateId,
        gate_type: GateType,
        parent: Option<GateId>,
    },
    BasicEventCreated {
        event: BasicEventId,
        parent: GateId,
    },
    ChildTarget {
        gate: GateId,
        target: usize,
    },
    NodeReused {
        parent: GateId,
        child: NodeId,
    },
    GateReuseFailed {
        gate: GateId,
        trials: usize,
    },
    TargetTruncated {
        gate: GateId,
        target: usize,
        realized: usize,
    },
    StarvationCorrection {
        host: GateId,
        new_gate: GateId,
        missing: usize,
    },
    HouseEventCreated {
        event: HouseEventId,
        parent: GateId,
    },
    CcfGroupCreated {
        name: String,
        size: usize,
    },
}

/// Tracer that accumulates events for later inspection.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Mutex<Vec<GenerationEvent>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get collected events as a vector.
    pub fn events(&self) -> Vec<GenerationEvent> {
        self.events.lock().clone()
    }

    /// Take collected events, clearing the collector.
    pub fn take(&self) -> Vec<GenerationEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    fn push(&self, event: GenerationEvent) {
        self.events.lock().push(event);
    }
}

impl Tracer for EventCollector {
    fn on_gate_created(&self, gate: GateId, gate_type: GateType, parent: Option<GateId>) {
        self.push(GenerationEvent::GateCreated {
            gate,
            gate_type,
            parent,
        });
    }

    fn on_basic_event_created(&self, event: BasicEventId, parent: GateId) {
        self.push(GenerationEvent::BasicEventCreated { event, parent });
    }

    fn on_child_target(&self, gate: GateId, target: usize) {
        self.push(GenerationEvent::ChildTarget { gate, target });
    }

    fn on_node_reused(&self, parent: GateId, child: NodeId) {
        self.push(GenerationEvent::NodeReused { parent, child });
    }

    fn on_gate_reuse_failed(&self, gate: GateId, trials: usize) {
        self.push(GenerationEvent::GateReuseFailed { gate, trials });
    }

    fn on_target_truncated(&self, gate: GateId, target: usize, realized: usize) {
        self.push(GenerationEvent::TargetTruncated {
            gate,
            target,
            realized,
        });
    }

    fn on_starvation_correction(&self, host: GateId, new_gate: GateId, missing: usize) {
        self.push(GenerationEvent::StarvationCorrection {
            host,
            new_gate,
            missing,
        });
    }

    fn on_house_event_created(&self, event: HouseEventId, parent: GateId) {
        self.push(GenerationEvent::HouseEventCreated { event, parent });
    }

    fn on_ccf_group_created(&self, name: &str, size: usize) {
        self.push(GenerationEvent::CcfGroupCreated {
            name: name.to_string(),
            size,
        });
    }
}

/// Tracer that forwards events to the `tracing` crate.
///
/// Per-node events are emitted at `TRACE`, corrective actions at `DEBUG`.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

#[cfg(feature = "tracing")]
impl Tracer for LogTracer {
    fn on_gate_created(&self, gate: GateId, gate_type: GateType, parent: Option<GateId>) {
        tracing::trace!(gate = gate.0, %gate_type, parent = ?parent.map(|p| p.0), "gate created");
    }

    fn on_basic_event_created(&self, event: BasicEventId, parent: GateId) {
        tracing::trace!(event = event.0, parent = parent.0, "basic event created");
    }

    fn on_child_target(&self, gate: GateId, target: usize) {
        tracing::trace!(gate = gate.0, target, "child target sampled");
    }

    fn on_node_reused(&self, parent: GateId, child: NodeId) {
        tracing::trace!(parent = parent.0, %child, "node reused");
    }

    fn on_gate_reuse_failed(&self, gate: GateId, trials: usize) {
        tracing::debug!(gate = gate.0, trials, "no cycle-safe gate found for reuse");
    }

    fn on_target_truncated(&self, gate: GateId, target: usize, realized: usize) {
        tracing::debug!(
            gate = gate.0,
            target,
            realized,
            "basic events exhausted, child target truncated"
        );
    }

    fn on_starvation_correction(&self, host: GateId, new_gate: GateId, missing: usize) {
        tracing::debug!(
            host = host.0,
            new_gate = new_gate.0,
            missing,
            "gate queue starved, growing a new gate"
        );
    }

    fn on_house_event_created(&self, event: HouseEventId, parent: GateId) {
        tracing::trace!(event = event.0, parent = parent.0, "house event created");
    }

    fn on_ccf_group_created(&self, name: &str, size: usize) {
        tracing::trace!(name, size, "ccf group created");
    }
}
