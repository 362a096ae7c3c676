//! Realized metrics of a generated tree and the exportable run record.

use crate::config::GeneratorConfig;
use crate::generator::GeneratedFaultTree;
use crate::model::{ComplexityModel, Estimates, GateType};
use crate::registry::Node;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Counts per gate type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateTypeCounts {
    pub and: usize,
    pub or: usize,
    pub atleast: usize,
    pub not: usize,
    pub xor: usize,
}

impl GateTypeCounts {
    pub fn get(&self, gate_type: GateType) -> usize {
        match gate_type {
            GateType::And => self.and,
            GateType::Or => self.or,
            GateType::AtLeast => self.atleast,
            GateType::Not => self.not,
            GateType::Xor => self.xor,
        }
    }

    fn increment(&mut self, gate_type: GateType) {
        let slot = match gate_type {
            GateType::And => &mut self.and,
            GateType::Or => &mut self.or,
            GateType::AtLeast => &mut self.atleast,
            GateType::Not => &mut self.not,
            GateType::Xor => &mut self.xor,
        };
        *slot += 1;
    }
}

/// Metrics of a generated fault tree.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeStats {
    pub num_basic_events: usize,
    pub num_house_events: usize,
    pub num_ccf_groups: usize,
    pub num_gates: usize,
    pub gate_types: GateTypeCounts,
    pub basic_events_per_gate: f64,
    pub avg_children: f64,
    pub num_shared_basic_events: usize,
    pub num_shared_gates: usize,
    /// Per-gate fraction of basic event children that are shared, averaged over gates.
    pub common_b: f64,
    /// Per-gate fraction of gate children that are shared, averaged over gates.
    pub common_g: f64,
    /// Per-gate fraction of gate and basic event children that are basic events.
    pub frac_b: f64,
    /// `None` when no basic event is shared.
    pub avg_parents_shared_basic_events: Option<f64>,
    /// `None` when no gate is shared.
    pub avg_parents_shared_gates: Option<f64>,
}

impl TreeStats {
    /// Compute metrics of a finished tree.
    pub fn from_generated(generated: &GeneratedFaultTree) -> Self {
        let tree = generated.tree();
        let num_gates = tree.num_gates();

        let mut stats = TreeStats {
            num_basic_events: tree.num_basic_events(),
            num_house_events: tree.num_house_events(),
            num_ccf_groups: generated.ccf().num_groups(),
            num_gates,
            ..Default::default()
        };

        if num_gates == 0 {
            return stats;
        }

        let mut total_children = 0;
        for (_, gate) in tree.gates() {
            stats.gate_types.increment(gate.gate_type());
            total_children += gate.num_children();

            let gates = gate.gates();
            let basics = gate.basic_events();
            if !gates.is_empty() || !basics.is_empty() {
                stats.frac_b += basics.len() as f64 / (gates.len() + basics.len()) as f64;
            }
            if !basics.is_empty() {
                let shared = basics
                    .iter()
                    .filter(|id| tree.basic_event(**id).is_shared())
                    .count();
                stats.common_b += shared as f64 / basics.len() as f64;
            }
            if !gates.is_empty() {
                let shared = gates.iter().filter(|id| tree.gate(**id).is_shared()).count();
                stats.common_g += shared as f64 / gates.len() as f64;
            }
        }

        let n = num_gates as f64;
        stats.common_b /= n;
        stats.common_g /= n;
        stats.frac_b /= n;
        stats.avg_children = total_children as f64 / n;
        stats.basic_events_per_gate = stats.num_basic_events as f64 / n;

        let shared_basics: Vec<usize> = tree
            .basic_events()
            .filter(|(_, e)| e.is_shared())
            .map(|(_, e)| e.num_parents())
            .collect();
        let shared_gates: Vec<usize> = tree
            .gates()
            .filter(|(_, g)| g.is_shared())
            .map(|(_, g)| g.num_parents())
            .collect();

        stats.num_shared_basic_events = shared_basics.len();
        stats.num_shared_gates = shared_gates.len();
        stats.avg_parents_shared_basic_events = average(&shared_basics);
        stats.avg_parents_shared_gates = average(&shared_gates);

        stats
    }
}

fn average(values: &[usize]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<usize>() as f64 / values.len() as f64)
}

/// Complete generation record for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Configuration used.
    pub config: GeneratorConfig,
    /// Expected values derived from the configuration.
    pub estimates: Estimates,
    /// Realized metrics.
    pub stats: TreeStats,
}

impl GenerationRecord {
    pub fn new(
        config: &GeneratorConfig,
        model: &ComplexityModel,
        generated: &GeneratedFaultTree,
    ) -> Self {
        Self {
            config: config.clone(),
            estimates: model.estimates(config.basics),
            stats: TreeStats::from_generated(generated),
        }
    }

    /// Export to a JSON file.
    pub fn export_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
