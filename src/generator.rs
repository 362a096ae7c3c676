//! Orchestration of one generation run.

use crate::builder::{distribute_house_events, TreeBuilder};
use crate::ccf::{assign_ccf_groups, CcfAssignment};
use crate::config::GeneratorConfig;
use crate::error::{ConfigError, GenerateError};
use crate::model::ComplexityModel;
use crate::registry::{BasicEventId, FaultTree};
use crate::tracer::{NoopTracer, Tracer};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A finished fault tree with its CCF assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFaultTree {
    name: String,
    tree: FaultTree,
    ccf: CcfAssignment,
}

impl GeneratedFaultTree {
    /// Name of the fault tree.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &FaultTree {
        &self.tree
    }

    pub fn ccf(&self) -> &CcfAssignment {
        &self.ccf
    }
}

/// Generates a fault tree from a validated configuration.
///
/// Construction validates the configuration; generation consumes the
/// generator so one random stream drives exactly one tree.
pub struct FaultTreeGenerator<T: Tracer = NoopTracer, R: Rng = SmallRng> {
    config: GeneratorConfig,
    model: ComplexityModel,
    tracer: T,
    rng: R,
}

impl FaultTreeGenerator<NoopTracer, SmallRng> {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        Self::with_tracer(config, NoopTracer)
    }
}

impl<T: Tracer> FaultTreeGenerator<T, SmallRng> {
    /// Create a generator reporting to `tracer`, seeded from `config.seed`.
    pub fn with_tracer(config: GeneratorConfig, tracer: T) -> Result<Self, ConfigError> {
        let model = config.validate()?;
        let rng = SmallRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            model,
            tracer,
            rng,
        })
    }
}

impl<T: Tracer, R: Rng> FaultTreeGenerator<T, R> {
    /// Create a generator driven by a caller-supplied random stream.
    ///
    /// `config.seed` is ignored.
    pub fn with_rng(config: GeneratorConfig, tracer: T, rng: R) -> Result<Self, ConfigError> {
        let model = config.validate()?;
        Ok(Self {
            config,
            model,
            tracer,
            rng,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn model(&self) -> &ComplexityModel {
        &self.model
    }

    pub fn generate(mut self) -> Result<GeneratedFaultTree, GenerateError> {
        let range = self.config.probability_range();

        let mut tree = TreeBuilder::new(
            &self.model,
            &mut self.rng,
            &self.tracer,
            range,
            self.config.basics,
        )
        .build(&self.config.root);

        if !distribute_house_events(&mut tree, self.config.house, &mut self.rng, &self.tracer) {
            return Err(GenerateError::NoHouseEventHost {
                requested: self.config.house,
            });
        }

        let events: Vec<BasicEventId> = tree.basic_event_ids().collect();
        let ccf = assign_ccf_groups(
            &events,
            self.config.ccf,
            self.config.children,
            range,
            &mut self.rng,
            &self.tracer,
        );

        Ok(GeneratedFaultTree {
            name: self.config.ft_name,
            tree,
            ccf,
        })
    }
}

/// Validate `config` and generate a tree with the seeded default stream.
pub fn generate(config: &GeneratorConfig) -> Result<GeneratedFaultTree, GenerateError> {
    FaultTreeGenerator::new(config.clone())?.generate()
}
