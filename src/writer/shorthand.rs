//! Shorthand text output.
//!
//! ```text
//! G1 := (E1 & E2)
//! G2 := (G1 | E3)
//! G3 := @(2, [E1, E2, E3])
//! G4 := ~E4
//! G5 := (E5 ^ E6)
//! ```
//!
//! The format has no notation for house events or CCF groups; house event
//! children are skipped and groups are not written.

use crate::generator::GeneratedFaultTree;
use crate::model::GateType;
use crate::registry::{FaultTree, Gate, Node};
use std::io::{self, Write};

/// Write `generated` in the shorthand format.
pub fn write_shorthand<W: Write>(out: &mut W, generated: &GeneratedFaultTree) -> io::Result<()> {
    let tree = generated.tree();
    writeln!(out, "{}", generated.name())?;
    writeln!(out)?;

    for id in tree.topological_order() {
        let gate = tree.gate(id);
        writeln!(out, "{} := {}", gate.name(), formula(tree, gate))?;
    }

    writeln!(out)?;
    for (_, event) in tree.basic_events() {
        writeln!(out, "p({}) = {}", event.name(), event.probability())?;
    }
    Ok(())
}

fn formula(tree: &FaultTree, gate: &Gate) -> String {
    let args: Vec<&str> = gate
        .gates()
        .iter()
        .map(|id| tree.gate(*id).name())
        .chain(gate.basic_events().iter().map(|id| tree.basic_event(*id).name()))
        .collect();

    match gate.gate_type() {
        GateType::And => format!("({})", args.join(" & ")),
        GateType::Or => format!("({})", args.join(" | ")),
        GateType::Xor => format!("({})", args.join(" ^ ")),
        GateType::Not => format!("~{}", args.join("")),
        GateType::AtLeast => format!(
            "@({}, [{}])",
            gate.k_num().unwrap_or_default(),
            args.join(", ")
        ),
    }
}
