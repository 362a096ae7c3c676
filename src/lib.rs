#![doc = include_str!("../README.md")]

mod builder;
mod ccf;
mod config;
mod distribution;
mod error;
mod generator;
mod model;
mod presets;
mod registry;
mod stats;
mod tracer;
mod validator;
pub mod writer;

pub use builder::{distribute_house_events, TreeBuilder};
pub use ccf::{assign_ccf_groups, CcfAssignment, CcfGroup, CCF_MODEL};
pub use config::{GeneratorConfig, OutputFormat};
pub use distribution::ProbabilityRange;
pub use error::{ConfigError, GenerateError};
pub use generator::{generate, FaultTreeGenerator, GeneratedFaultTree};
pub use model::{ChildCount, ComplexityModel, Estimates, GateType};
pub use presets::Presets;
pub use registry::{
    BasicEvent, BasicEventId, FaultTree, Gate, GateId, HouseEvent, HouseEventId, Node, NodeId,
};
pub use stats::{GateTypeCounts, GenerationRecord, TreeStats};
#[cfg(feature = "tracing")]
pub use tracer::LogTracer;
pub use tracer::{EventCollector, GenerationEvent, NoopTracer, Tracer};
pub use validator::{validate_tree, ValidationReport, Violation};
