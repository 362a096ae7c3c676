//! Command-line front end: generate one fault tree and write it to a file.

use anyhow::{bail, Context};
use clap::Parser;
use fault_tree_gen::{
    validate_tree, writer, FaultTreeGenerator, GenerateError, GenerationRecord, GeneratorConfig,
    LogTracer, OutputFormat,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ftgen")]
#[command(about = "Create a fault tree of an arbitrary size and complexity")]
struct Args {
    /// Name for the fault tree
    #[arg(long, default_value = "Autogenerated", value_name = "NCNAME")]
    ft_name: String,

    /// Name for the root gate
    #[arg(long, default_value = "root", value_name = "NCNAME")]
    root: String,

    /// Seed of the pseudo-random number generator
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Number of basic events
    #[arg(short, long, default_value_t = 100)]
    basics: usize,

    /// Average number of children gates
    #[arg(short, long, default_value_t = 3.0, allow_negative_numbers = true)]
    children: f64,

    /// Weights for sampling [AND, OR, K/N, NOT, XOR] gate types
    #[arg(
        long,
        num_args = 1..,
        default_values_t = [1.0, 1.0, 0.0, 0.0, 0.0],
        allow_negative_numbers = true
    )]
    weights_g: Vec<f64>,

    /// Percentage of common basic events per gate
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    common_b: f64,

    /// Percentage of common gates per gate
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    common_g: f64,

    /// Average number of parents for common basic events
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    parents_b: f64,

    /// Average number of parents for common gates
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    parents_g: f64,

    /// Maximum probability for basic events
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    maxprob: f64,

    /// Minimum probability for basic events
    #[arg(long, default_value_t = 0.001, allow_negative_numbers = true)]
    minprob: f64,

    /// Number of house events
    #[arg(long, default_value_t = 0)]
    house: usize,

    /// Number of CCF groups
    #[arg(long, default_value_t = 0)]
    ccf: usize,

    /// Output file [default: fault_tree.xml, or fault_tree.txt with --shorthand]
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Apply the shorthand format to the output
    #[arg(long)]
    shorthand: bool,

    /// Write a JSON record with the configuration and tree metrics
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> GeneratorConfig {
        let format = if self.shorthand {
            OutputFormat::Shorthand
        } else {
            OutputFormat::Xml
        };
        GeneratorConfig::default()
            .with_ft_name(self.ft_name.clone())
            .with_root(self.root.clone())
            .with_seed(self.seed)
            .with_basics(self.basics)
            .with_children(self.children)
            .with_weights(self.weights_g.clone())
            .with_common_b(self.common_b)
            .with_common_g(self.common_g)
            .with_parents_b(self.parents_b)
            .with_parents_g(self.parents_g)
            .with_probability_range(self.minprob, self.maxprob)
            .with_house(self.house)
            .with_ccf(self.ccf)
            .with_format(format)
    }

    fn out_path(&self) -> PathBuf {
        match (&self.out, self.shorthand) {
            (Some(path), _) => path.clone(),
            (None, true) => PathBuf::from("fault_tree.txt"),
            (None, false) => PathBuf::from("fault_tree.xml"),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    let config = args.config();
    let out = args.out_path();

    let generator =
        FaultTreeGenerator::with_tracer(config.clone(), LogTracer).map_err(GenerateError::from)?;
    let model = generator.model().clone();
    let estimates = model.estimates(config.basics);
    tracing::info!(
        max_children = model.max_children(),
        ratio = model.ratio(),
        percent_basics = model.percent_basics(),
        "complexity model"
    );
    tracing::info!(
        gates = estimates.gates,
        common_basic_events = estimates.common_basic_events,
        common_gates = estimates.common_gates,
        "estimated tree size"
    );

    let generated = generator.generate()?;
    let tree = generated.tree();
    tracing::info!(
        gates = tree.num_gates(),
        basic_events = tree.num_basic_events(),
        house_events = tree.num_house_events(),
        ccf_groups = generated.ccf().num_groups(),
        "fault tree generated"
    );

    let report = validate_tree(&generated, &config);
    if !report.is_valid() {
        for violation in &report.violations {
            tracing::error!(%violation, "invalid fault tree");
        }
        bail!(
            "generated fault tree violates {} structural checks",
            report.violations.len()
        );
    }

    let file = File::create(&out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut sink = BufWriter::new(file);
    writer::write_tree(&mut sink, &generated, &config)
        .and_then(|()| sink.flush())
        .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), format = %config.format, "fault tree written");

    if let Some(path) = &args.report {
        GenerationRecord::new(&config, &model, &generated)
            .export_to_file(path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        tracing::info!(path = %path.display(), "generation record written");
    }

    Ok(())
}
