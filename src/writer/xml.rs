//! OpenPSA MEF XML output.

use super::escape;
use crate::config::GeneratorConfig;
use crate::generator::GeneratedFaultTree;
use crate::model::GateType;
use crate::registry::{FaultTree, Gate, Node};
use crate::stats::TreeStats;
use std::io::{self, Write};

/// Write `generated` as an OpenPSA MEF document.
///
/// The document starts with two comments: the generation parameters and the
/// realized metrics of the tree.
pub fn write_xml<W: Write>(
    out: &mut W,
    generated: &GeneratedFaultTree,
    config: &GeneratorConfig,
) -> io::Result<()> {
    writeln!(out, "<?xml version=\"1.0\"?>")?;
    write_parameters(out, config)?;
    write_metrics(out, &TreeStats::from_generated(generated))?;

    let tree = generated.tree();
    writeln!(out, "<opsa-mef>")?;
    writeln!(
        out,
        "<define-fault-tree name=\"{}\">",
        escape(generated.name())
    )?;

    for id in tree.topological_order() {
        write_gate(out, tree, tree.gate(id))?;
    }

    for group in generated.ccf().groups() {
        writeln!(
            out,
            "<define-CCF-group name=\"{}\" model=\"{}\">",
            group.name(),
            group.model()
        )?;
        writeln!(out, "<members>")?;
        for member in group.members() {
            writeln!(
                out,
                "<basic-event name=\"{}\"/>",
                tree.basic_event(*member).name()
            )?;
        }
        writeln!(out, "</members>")?;
        writeln!(out, "<distribution>")?;
        writeln!(out, "<float value=\"{}\"/>", group.probability())?;
        writeln!(out, "</distribution>")?;
        writeln!(out, "<factors>")?;
        for (level, factor) in (2..).zip(group.factors()) {
            writeln!(out, "<factor level=\"{level}\">")?;
            writeln!(out, "<float value=\"{factor}\"/>")?;
            writeln!(out, "</factor>")?;
        }
        writeln!(out, "</factors>")?;
        writeln!(out, "</define-CCF-group>")?;
    }
    writeln!(out, "</define-fault-tree>")?;

    writeln!(out, "<model-data>")?;
    let mut events = generated.ccf().non_ccf_events().to_vec();
    events.sort_unstable();
    for id in events {
        let event = tree.basic_event(id);
        writeln!(out, "<define-basic-event name=\"{}\">", event.name())?;
        writeln!(out, "<float value=\"{}\"/>", event.probability())?;
        writeln!(out, "</define-basic-event>")?;
    }
    for (_, house) in tree.house_events() {
        writeln!(out, "<define-house-event name=\"{}\">", house.name())?;
        writeln!(out, "<constant value=\"{}\"/>", house.state())?;
        writeln!(out, "</define-house-event>")?;
    }
    writeln!(out, "</model-data>")?;
    writeln!(out, "</opsa-mef>")
}

fn write_gate<W: Write>(out: &mut W, tree: &FaultTree, gate: &Gate) -> io::Result<()> {
    let gate_type = gate.gate_type();
    writeln!(out, "<define-gate name=\"{}\">", escape(gate.name()))?;
    match (gate_type, gate.k_num()) {
        (GateType::AtLeast, Some(k)) => writeln!(out, "<{gate_type} min=\"{k}\">")?,
        _ => writeln!(out, "<{gate_type}>")?,
    }
    for child in gate.gates() {
        writeln!(out, "<gate name=\"{}\"/>", escape(tree.gate(*child).name()))?;
    }
    for child in gate.basic_events() {
        writeln!(out, "<basic-event name=\"{}\"/>", tree.basic_event(*child).name())?;
    }
    for child in gate.house_events() {
        writeln!(out, "<house-event name=\"{}\"/>", tree.house_event(*child).name())?;
    }
    writeln!(out, "</{gate_type}>")?;
    writeln!(out, "</define-gate>")
}

fn write_parameters<W: Write>(out: &mut W, config: &GeneratorConfig) -> io::Result<()> {
    // "--" may not appear inside an XML comment.
    let comment_safe = |s: &str| s.replace("--", "- -");
    writeln!(out, "<!--")?;
    writeln!(out, "This is an autogenerated fault tree description")?;
    writeln!(out, "with the following parameters:")?;
    writeln!(out)?;
    writeln!(out, "The fault tree name: {}", comment_safe(&config.ft_name))?;
    writeln!(out, "The root gate name: {}", comment_safe(&config.root))?;
    writeln!(out)?;
    writeln!(out, "The seed of the random number generator: {}", config.seed)?;
    writeln!(out, "The number of basic events: {}", config.basics)?;
    writeln!(out, "The number of house events: {}", config.house)?;
    writeln!(out, "The number of CCF groups: {}", config.ccf)?;
    writeln!(out, "The average number of children for gates: {}", config.children)?;
    writeln!(
        out,
        "The weights of gate types [AND, OR, K/N, NOT, XOR]: {:?}",
        config.weights_g
    )?;
    writeln!(out, "Percentage of common basic events per gate: {}", config.common_b)?;
    writeln!(out, "Percentage of common gates per gate: {}", config.common_g)?;
    writeln!(
        out,
        "The avg. number of parents for common basic events: {}",
        config.parents_b
    )?;
    writeln!(out, "The avg. number of parents for common gates: {}", config.parents_g)?;
    writeln!(out, "Maximum probability for basic events: {}", config.maxprob)?;
    writeln!(out, "Minimum probability for basic events: {}", config.minprob)?;
    writeln!(out, "-->")
}

fn write_metrics<W: Write>(out: &mut W, stats: &TreeStats) -> io::Result<()> {
    writeln!(out, "<!--")?;
    writeln!(out, "The generated fault tree has the following metrics:")?;
    writeln!(out)?;
    writeln!(out, "The number of basic events: {}", stats.num_basic_events)?;
    writeln!(out, "The number of house events: {}", stats.num_house_events)?;
    writeln!(out, "The number of CCF groups: {}", stats.num_ccf_groups)?;
    writeln!(out, "The number of gates: {}", stats.num_gates)?;
    writeln!(out, "    AND gates: {}", stats.gate_types.and)?;
    writeln!(out, "    OR gates: {}", stats.gate_types.or)?;
    writeln!(out, "    K/N gates: {}", stats.gate_types.atleast)?;
    writeln!(out, "    NOT gates: {}", stats.gate_types.not)?;
    writeln!(out, "    XOR gates: {}", stats.gate_types.xor)?;
    writeln!(out, "Basic events to gates ratio: {:.6}", stats.basic_events_per_gate)?;
    writeln!(out, "The average number of children for gates: {:.6}", stats.avg_children)?;
    writeln!(out, "The number of common basic events: {}", stats.num_shared_basic_events)?;
    writeln!(out, "The number of common gates: {}", stats.num_shared_gates)?;
    writeln!(out, "Percentage of common basic events per gate: {:.6}", stats.common_b)?;
    writeln!(out, "Percentage of common gates per gate: {:.6}", stats.common_g)?;
    writeln!(
        out,
        "Percentage of children that are basic events per gate: {:.6}",
        stats.frac_b
    )?;
    if let Some(avg) = stats.avg_parents_shared_basic_events {
        writeln!(out, "The avg. number of parents for common basic events: {avg:.6}")?;
    }
    if let Some(avg) = stats.avg_parents_shared_gates {
        writeln!(out, "The avg. number of parents for common gates: {avg:.6}")?;
    }
    writeln!(out, "-->")?;
    writeln!(out)
}
