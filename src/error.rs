//! Error types for configuration and generation.

use crate::config::OutputFormat;

/// Reasons a [`GeneratorConfig`](crate::GeneratorConfig) is rejected.
///
/// Every variant is detected by
/// [`GeneratorConfig::validate`](crate::GeneratorConfig::validate) before the
/// random stream is seeded, so a rejected configuration never produces a
/// partial tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A floating-point option is NaN or infinite.
    #[error("{field} is not a finite number")]
    NotFinite {
        /// Name of the offending option.
        field: &'static str,
    },

    /// An option that must be nonnegative is negative.
    #[error("{field} is negative: {value}")]
    Negative {
        /// Name of the offending option.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// An option exceeds its upper bound.
    #[error("{field} is more than {max}: {value}")]
    AboveMax {
        /// Name of the offending option.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Largest accepted value.
        max: f64,
    },

    /// An option is below its structural minimum.
    #[error("{field} is less than {min}: {value}")]
    BelowMin {
        /// Name of the offending option.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Smallest accepted value.
        min: f64,
    },

    /// A name option is empty.
    #[error("{field} must not be empty")]
    EmptyName {
        /// Name of the offending option.
        field: &'static str,
    },

    /// `maxprob` is smaller than `minprob`.
    #[error("max probability {max} < min probability {min}")]
    InvertedProbabilityBounds {
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },

    /// At least as many house events as basic events were requested.
    #[error("too many house events: {house} requested for {basics} basic events")]
    TooManyHouseEvents {
        /// Requested house events.
        house: usize,
        /// Requested basic events.
        basics: usize,
    },

    /// More CCF groups than `basics / children` were requested.
    #[error("too many CCF groups: {ccf} requested, at most {max} supported")]
    TooManyCcfGroups {
        /// Requested groups.
        ccf: usize,
        /// `basics / children`.
        max: f64,
    },

    /// More than one weight per gate type.
    #[error("too many gate type weights: {0} provided, at most 5 expected")]
    TooManyWeights(usize),

    /// A gate type weight is negative or not finite.
    #[error("gate type weight #{index} is invalid: {value}")]
    InvalidWeight {
        /// Position in the weight vector.
        index: usize,
        /// The rejected weight.
        value: f64,
    },

    /// All gate type weights are zero.
    #[error("at least one non-zero gate type weight is needed")]
    ZeroWeights,

    /// Neither AND nor OR can be sampled, so no root gate can be created.
    #[error("the root gate needs a non-zero AND or OR weight")]
    NoRootGateType,

    /// Gate sharing is so high that gates never leave room for basic events.
    #[error(
        "{children} children per gate with {common_g} common gates leave no room for basic events"
    )]
    NoRoomForBasicEvents {
        /// Average number of children.
        children: f64,
        /// Fraction of reused gates.
        common_g: f64,
    },

    /// The basic event budget cannot satisfy the minimum arity of the enabled gate types.
    #[error("{basics} basic events cannot fill a gate that needs {required} distinct children")]
    TooFewBasicEvents {
        /// Requested basic events.
        basics: usize,
        /// Smallest supported budget.
        required: usize,
    },

    /// The output format has no representation for house events.
    #[error("house events cannot be represented in the {0} format")]
    HouseEventsUnsupported(OutputFormat),
}

/// Errors raised while generating a fault tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    /// The configuration was rejected before generation started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// House events were requested but the finished tree has no gate that may carry them.
    #[error("no gate can host house events ({requested} requested): only the root or NOT/XOR gates exist")]
    NoHouseEventHost {
        /// Requested house events.
        requested: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_wrapped_as_invalid_configuration() {
        let err = GenerateError::from(ConfigError::ZeroWeights);
        assert_eq!(
            err.to_string(),
            "invalid configuration: at least one non-zero gate type weight is needed"
        );
    }

    #[test]
    fn test_messages_name_the_option() {
        let err = ConfigError::AboveMax {
            field: "common_b",
            value: 0.95,
            max: 0.9,
        };
        assert_eq!(err.to_string(), "common_b is more than 0.9: 0.95");

        let err = ConfigError::HouseEventsUnsupported(OutputFormat::Shorthand);
        assert_eq!(
            err.to_string(),
            "house events cannot be represented in the shorthand format"
        );
    }
}
