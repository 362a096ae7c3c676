//! Configuration for fault tree generation.

use crate::distribution::ProbabilityRange;
use crate::error::ConfigError;
use crate::model::ComplexityModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output representation requested for the generated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// OpenPSA MEF XML.
    #[default]
    Xml,
    /// Shorthand text format (no house events, no CCF groups).
    Shorthand,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Shorthand => "shorthand",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    // === Naming ===
    /// Name of the fault tree.
    pub ft_name: String,

    /// Name of the root gate.
    pub root: String,

    // === RNG ===
    /// Seed for the pseudo-random stream.
    pub seed: u64,

    // === Structure ===
    /// Exact number of basic events.
    pub basics: usize,

    /// Average number of children per gate.
    pub children: f64,

    /// Weights for sampling [AND, OR, ATLEAST, NOT, XOR] gate types.
    pub weights_g: Vec<f64>,

    // === Sharing ===
    /// Fraction of reused basic events among basic-event children.
    pub common_b: f64,

    /// Fraction of reused gates among gate children.
    pub common_g: f64,

    /// Target average number of parents for shared basic events.
    pub parents_b: f64,

    /// Target average number of parents for shared gates.
    pub parents_g: f64,

    // === Probabilities ===
    /// Lower bound for basic event probabilities.
    pub minprob: f64,

    /// Upper bound for basic event probabilities.
    pub maxprob: f64,

    // === Extras ===
    /// Number of house events.
    pub house: usize,

    /// Number of CCF groups.
    pub ccf: usize,

    /// Output format the tree is generated for.
    pub format: OutputFormat,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ft_name: "Autogenerated".to_string(),
            root: "root".to_string(),
            seed: 123,
            basics: 100,
            children: 3.0,
            weights_g: vec![1.0, 1.0, 0.0, 0.0, 0.0],
            common_b: 0.1,
            common_g: 0.1,
            parents_b: 2.0,
            parents_g: 2.0,
            minprob: 0.001,
            maxprob: 0.1,
            house: 0,
            ccf: 0,
            format: OutputFormat::Xml,
        }
    }
}

impl GeneratorConfig {
    /// Small tree for fast tests: 10 basic events, AND/OR only.
    pub fn minimal() -> Self {
        Self::default().with_basics(10)
    }

    // === Builder methods ===

    pub fn with_ft_name(mut self, name: impl Into<String>) -> Self {
        self.ft_name = name.into();
        self
    }

    pub fn with_root(mut self, name: impl Into<String>) -> Self {
        self.root = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_basics(mut self, basics: usize) -> Self {
        self.basics = basics;
        self
    }

    pub fn with_children(mut self, children: f64) -> Self {
        self.children = children;
        self
    }

    pub fn with_weights(mut self, weights: impl Into<Vec<f64>>) -> Self {
        self.weights_g = weights.into();
        self
    }

    pub fn with_common_b(mut self, common_b: f64) -> Self {
        self.common_b = common_b;
        self
    }

    pub fn with_common_g(mut self, common_g: f64) -> Self {
        self.common_g = common_g;
        self
    }

    pub fn with_parents_b(mut self, parents_b: f64) -> Self {
        self.parents_b = parents_b;
        self
    }

    pub fn with_parents_g(mut self, parents_g: f64) -> Self {
        self.parents_g = parents_g;
        self
    }

    pub fn with_probability_range(mut self, min: f64, max: f64) -> Self {
        self.minprob = min;
        self.maxprob = max;
        self
    }

    pub fn with_house(mut self, house: usize) -> Self {
        self.house = house;
        self
    }

    pub fn with_ccf(mut self, ccf: usize) -> Self {
        self.ccf = ccf;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn probability_range(&self) -> ProbabilityRange {
        ProbabilityRange::new(self.minprob, self.maxprob)
    }

    /// Check every option and their combinations, and derive the model.
    ///
    /// No randomness is consumed; a configuration that passes is guaranteed
    /// to generate a tree with exactly `basics` basic events.
    pub fn validate(&self) -> Result<ComplexityModel, ConfigError> {
        check_name("ft_name", &self.ft_name)?;
        check_name("root", &self.root)?;

        for (field, value) in [
            ("children", self.children),
            ("common_b", self.common_b),
            ("common_g", self.common_g),
            ("parents_b", self.parents_b),
            ("parents_g", self.parents_g),
            ("minprob", self.minprob),
            ("maxprob", self.maxprob),
        ] {
            check_finite(field, value)?;
            check_positive(field, value)?;
        }

        if self.basics == 0 {
            return Err(ConfigError::BelowMin {
                field: "basics",
                value: 0.0,
                min: 1.0,
            });
        }

        check_less("common_b", self.common_b, 0.9)?;
        check_less("common_g", self.common_g, 0.9)?;
        check_less("minprob", self.minprob, 1.0)?;
        check_less("maxprob", self.maxprob, 1.0)?;

        check_more("children", self.children, 2.0)?;
        check_more("parents_b", self.parents_b, 2.0)?;
        check_more("parents_g", self.parents_g, 2.0)?;

        if self.maxprob < self.minprob {
            return Err(ConfigError::InvertedProbabilityBounds {
                min: self.minprob,
                max: self.maxprob,
            });
        }

        if self.house >= self.basics {
            return Err(ConfigError::TooManyHouseEvents {
                house: self.house,
                basics: self.basics,
            });
        }

        let max_ccf = self.basics as f64 / self.children;
        if self.ccf as f64 > max_ccf {
            return Err(ConfigError::TooManyCcfGroups {
                ccf: self.ccf,
                max: max_ccf,
            });
        }

        let model = ComplexityModel::new(
            self.children,
            &self.weights_g,
            self.common_b,
            self.common_g,
            self.parents_b,
            self.parents_g,
        )?;

        if !model.can_sample_root() {
            return Err(ConfigError::NoRootGateType);
        }

        if model.ratio() <= 0.0 {
            return Err(ConfigError::NoRoomForBasicEvents {
                children: self.children,
                common_g: self.common_g,
            });
        }

        let required = model.min_basic_events();
        if self.basics < required {
            return Err(ConfigError::TooFewBasicEvents {
                basics: self.basics,
                required,
            });
        }

        if self.format == OutputFormat::Shorthand && self.house > 0 {
            return Err(ConfigError::HouseEventsUnsupported(self.format));
        }

        Ok(model)
    }
}

fn check_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyName { field });
    }
    Ok(())
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn check_less(field: &'static str, value: f64, max: f64) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::AboveMax { field, value, max });
    }
    Ok(())
}

fn check_more(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::BelowMin { field, value, min });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let model = GeneratorConfig::default().validate().unwrap();
        assert_eq!(model.max_children(), 4.0);
    }

    #[test]
    fn test_builder_methods() {
        let config = GeneratorConfig::minimal()
            .with_seed(7)
            .with_children(4.0)
            .with_weights([1.0, 1.0, 1.0])
            .with_probability_range(0.01, 0.2)
            .with_house(2)
            .with_ccf(1);
        assert_eq!(config.basics, 10);
        assert_eq!(config.seed, 7);
        assert_eq!(config.weights_g, vec![1.0, 1.0, 1.0]);
        assert_eq!(config.probability_range(), ProbabilityRange::new(0.01, 0.2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values() {
        let err = GeneratorConfig::default()
            .with_common_b(0.95)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::AboveMax { field: "common_b", .. }));

        let err = GeneratorConfig::default()
            .with_common_g(-0.1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Negative { field: "common_g", .. }));

        let err = GeneratorConfig::default()
            .with_children(1.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::BelowMin { field: "children", .. }));

        let err = GeneratorConfig::default()
            .with_parents_b(1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::BelowMin { field: "parents_b", .. }));

        let err = GeneratorConfig::default()
            .with_basics(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::BelowMin { field: "basics", .. }));

        let err = GeneratorConfig::default()
            .with_children(f64::NAN)
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::NotFinite { field: "children" });
    }

    #[test]
    fn test_probability_bounds() {
        let err = GeneratorConfig::default()
            .with_probability_range(0.5, 0.1)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvertedProbabilityBounds { min: 0.5, max: 0.1 }
        );

        let err = GeneratorConfig::default()
            .with_probability_range(0.1, 1.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::AboveMax { field: "maxprob", .. }));
    }

    #[test]
    fn test_incompatible_combinations() {
        let err = GeneratorConfig::minimal()
            .with_house(10)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooManyHouseEvents {
                house: 10,
                basics: 10
            }
        );

        let err = GeneratorConfig::minimal()
            .with_ccf(4)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::TooManyCcfGroups { ccf: 4, .. }));

        let err = GeneratorConfig::default()
            .with_weights([0.0, 0.0, 0.0, 0.0, 0.0])
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroWeights);

        let err = GeneratorConfig::default()
            .with_weights([1.0; 6])
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::TooManyWeights(6));

        let err = GeneratorConfig::default()
            .with_weights([0.0, 0.0, 1.0, 1.0])
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::NoRootGateType);
    }

    #[test]
    fn test_sharing_must_leave_room_for_basic_events() {
        // 3 * (1 - 0.9) - 1 < 0
        let err = GeneratorConfig::default()
            .with_common_g(0.9)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoRoomForBasicEvents { .. }));
    }

    #[test]
    fn test_too_few_basic_events_for_atleast() {
        let err = GeneratorConfig::default()
            .with_basics(2)
            .with_children(2.0)
            .with_weights([1.0, 0.0, 1.0])
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooFewBasicEvents {
                basics: 2,
                required: 3
            }
        );
    }

    #[test]
    fn test_shorthand_rejects_house_events() {
        let err = GeneratorConfig::minimal()
            .with_house(1)
            .with_format(OutputFormat::Shorthand)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::HouseEventsUnsupported(OutputFormat::Shorthand)
        );
    }

    #[test]
    fn test_empty_names() {
        let err = GeneratorConfig::default()
            .with_root("")
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyName { field: "root" });
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"basics": 42, "format": "shorthand"}"#).unwrap();
        assert_eq!(config.basics, 42);
        assert_eq!(config.format, OutputFormat::Shorthand);
        assert_eq!(config.root, "root");
    }
}
