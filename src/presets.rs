//! Predefined configurations for common generation scenarios.

use crate::config::GeneratorConfig;

/// Collection of preset configurations.
pub struct Presets;

impl Presets {
    /// Quick sanity check with a handful of AND/OR gates.
    pub fn small() -> GeneratorConfig {
        GeneratorConfig::minimal()
            .with_basics(20)
            .with_common_b(0.0)
            .with_common_g(0.0)
    }

    /// The command-line defaults.
    pub fn standard() -> GeneratorConfig {
        GeneratorConfig::default()
    }

    /// Heavy sharing of basic events and gates.
    pub fn shared() -> GeneratorConfig {
        GeneratorConfig::default()
            .with_basics(200)
            .with_children(4.0)
            .with_common_b(0.5)
            .with_common_g(0.4)
            .with_parents_b(3.0)
            .with_parents_g(3.0)
    }

    /// Every gate type enabled.
    pub fn advanced_gates() -> GeneratorConfig {
        GeneratorConfig::default()
            .with_basics(200)
            .with_weights([1.0, 1.0, 0.5, 0.2, 0.2])
    }

    /// House events and CCF groups on top of the defaults.
    pub fn house_and_ccf() -> GeneratorConfig {
        GeneratorConfig::default()
            .with_basics(150)
            .with_children(3.5)
            .with_house(10)
            .with_ccf(12)
    }

    /// Large tree for benchmarking.
    pub fn large() -> GeneratorConfig {
        GeneratorConfig::default()
            .with_basics(5000)
            .with_children(4.0)
            .with_weights([1.0, 1.0, 0.3, 0.1, 0.1])
            .with_common_b(0.2)
            .with_common_g(0.2)
    }

    /// All presets as a list for iteration.
    pub fn all() -> Vec<(&'static str, GeneratorConfig)> {
        vec![
            ("small", Self::small()),
            ("standard", Self::standard()),
            ("shared", Self::shared()),
            ("advanced_gates", Self::advanced_gates()),
            ("house_and_ccf", Self::house_and_ccf()),
            ("large", Self::large()),
        ]
    }
}
