//! Complexity model: turns target statistics into sampling parameters.

use crate::distribution::{coin, round_stochastic};
use crate::error::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical operator of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateType {
    And,
    Or,
    /// K/N combination gate; the threshold lives on the gate.
    AtLeast,
    Not,
    Xor,
}

impl GateType {
    /// All gate types in weight-vector order.
    pub const ALL: [GateType; 5] = [
        GateType::And,
        GateType::Or,
        GateType::AtLeast,
        GateType::Not,
        GateType::Xor,
    ];

    /// Name used by the OpenPSA MEF format.
    pub fn name(&self) -> &'static str {
        match self {
            GateType::And => "and",
            GateType::Or => "or",
            GateType::AtLeast => "atleast",
            GateType::Not => "not",
            GateType::Xor => "xor",
        }
    }

    /// Smallest number of children a gate of this type may have.
    pub fn min_children(&self) -> usize {
        match self {
            GateType::And | GateType::Or | GateType::Xor => 2,
            GateType::AtLeast => 3,
            GateType::Not => 1,
        }
    }

    /// NOT and XOR gates have an exact arity and never take extra children.
    pub fn is_fixed_arity(&self) -> bool {
        matches!(self, GateType::Not | GateType::Xor)
    }

    fn index(&self) -> usize {
        match self {
            GateType::And => 0,
            GateType::Or => 1,
            GateType::AtLeast => 2,
            GateType::Not => 3,
            GateType::Xor => 4,
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target child count sampled for one gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildCount {
    pub children: usize,
    /// Threshold for ATLEAST gates, `None` otherwise.
    pub k_num: Option<usize>,
}

/// Diagnostic estimates derived from the model.
///
/// These are informational only; the builder does not try to hit them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimates {
    pub gates: f64,
    pub common_basic_events: f64,
    pub common_gates: f64,
}

/// Sampling distributions and bounds derived from the target statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityModel {
    avg_children: f64,
    common_b: f64,
    common_g: f64,
    parents_b: f64,
    parents_g: f64,
    weights: [f64; 5],
    norm_weights: [f64; 5],
    cum_dist: [f64; 6],
    max_children: f64,
    ratio: f64,
    percent_basics: f64,
    percent_gates: f64,
}

impl ComplexityModel {
    /// Build the model from target statistics.
    ///
    /// `weights` lists AND, OR, ATLEAST, NOT, XOR weights; missing trailing
    /// weights are zero. The numeric arguments are expected to be validated
    /// already; only the weight vector is checked here.
    pub fn new(
        avg_children: f64,
        weights: &[f64],
        common_b: f64,
        common_g: f64,
        parents_b: f64,
        parents_g: f64,
    ) -> Result<Self, ConfigError> {
        let weights = normalize_input(weights)?;
        let total: f64 = weights.iter().sum();

        let mut norm_weights = [0.0; 5];
        for (norm, weight) in norm_weights.iter_mut().zip(weights) {
            *norm = weight / total;
        }

        let mut cum_dist = [0.0; 6];
        for (i, norm) in norm_weights.iter().enumerate() {
            cum_dist[i + 1] = cum_dist[i] + norm;
        }

        let max_children = calculate_max_children(avg_children, &norm_weights);
        let ratio = avg_children * (1.0 - common_g) - 1.0;

        Ok(Self {
            avg_children,
            common_b,
            common_g,
            parents_b,
            parents_g,
            weights,
            norm_weights,
            cum_dist,
            max_children,
            ratio,
            percent_basics: ratio / (1.0 + ratio),
            percent_gates: 1.0 / (1.0 + ratio),
        })
    }

    pub fn avg_children(&self) -> f64 {
        self.avg_children
    }

    pub fn common_b(&self) -> f64 {
        self.common_b
    }

    pub fn common_g(&self) -> f64 {
        self.common_g
    }

    /// Weights as provided, padded to five entries.
    pub fn weights(&self) -> &[f64; 5] {
        &self.weights
    }

    pub fn norm_weights(&self) -> &[f64; 5] {
        &self.norm_weights
    }

    /// Upper bound of the symmetric child-count range (may be fractional).
    pub fn max_children(&self) -> f64 {
        self.max_children
    }

    /// Expected basic events per fresh gate, adjusted for gate sharing.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn percent_basics(&self) -> f64 {
        self.percent_basics
    }

    pub fn percent_gates(&self) -> f64 {
        self.percent_gates
    }

    /// Probability of sampling `gate_type`.
    pub fn weight_of(&self, gate_type: GateType) -> f64 {
        self.norm_weights[gate_type.index()]
    }

    /// Whether a root gate (AND or OR) can be sampled at all.
    pub fn can_sample_root(&self) -> bool {
        self.weight_of(GateType::And) > 0.0 || self.weight_of(GateType::Or) > 0.0
    }

    /// Smallest basic event budget that lets every enabled gate type reach
    /// its minimum arity from basic events alone.
    pub fn min_basic_events(&self) -> usize {
        GateType::ALL
            .iter()
            .filter(|t| self.weight_of(**t) > 0.0)
            .map(GateType::min_children)
            .chain([GateType::And.min_children()])
            .max()
            .unwrap_or(2)
    }

    /// Sample a gate type from the cumulative weight distribution.
    pub fn sample_gate_type<R: Rng>(&self, rng: &mut R) -> GateType {
        let r: f64 = rng.gen();
        GateType::ALL
            .iter()
            .zip(&self.cum_dist[1..])
            .find(|(_, &bound)| r < bound)
            .map(|(gate_type, _)| *gate_type)
            // Rounding can leave the last bound just under 1.0.
            .unwrap_or_else(|| self.last_enabled_type())
    }

    fn last_enabled_type(&self) -> GateType {
        GateType::ALL
            .iter()
            .rev()
            .find(|t| self.weight_of(**t) > 0.0)
            .copied()
            .unwrap_or(GateType::And)
    }

    /// Sample the target number of children for a gate of `gate_type`.
    ///
    /// For ATLEAST gates the threshold is sampled as well.
    pub fn sample_child_count<R: Rng>(&self, gate_type: GateType, rng: &mut R) -> ChildCount {
        match gate_type {
            GateType::Not => ChildCount {
                children: 1,
                k_num: None,
            },
            GateType::Xor => ChildCount {
                children: 2,
                k_num: None,
            },
            GateType::AtLeast => {
                let max = round_stochastic(rng, self.max_children).max(3);
                let children = rng.gen_range(3..=max);
                let k_num = rng.gen_range(2..=children - 1);
                ChildCount {
                    children,
                    k_num: Some(k_num),
                }
            }
            GateType::And | GateType::Or => {
                let max = round_stochastic(rng, self.max_children).max(2);
                ChildCount {
                    children: rng.gen_range(2..=max),
                    k_num: None,
                }
            }
        }
    }

    /// Decide whether the next child is a nested gate (`true`) or a basic event.
    pub fn choose_gate_child<R: Rng>(&self, rng: &mut R) -> bool {
        coin(rng, self.percent_gates)
    }

    /// Approximate number of gates needed for `num_basics` basic events.
    pub fn estimate_gates(&self, num_basics: usize) -> f64 {
        num_basics as f64 / (self.percent_basics * self.avg_children * (1.0 - self.common_b))
    }

    /// Number of shared basic events needed to reach the `parents_b` target.
    pub fn estimate_common_basic_events(&self, num_gates: f64) -> f64 {
        self.common_b * self.percent_basics * self.avg_children * num_gates / self.parents_b
    }

    /// Number of shared gates needed to reach the `parents_g` target.
    pub fn estimate_common_gates(&self, num_gates: f64) -> f64 {
        self.common_g * self.percent_gates * self.avg_children * num_gates / self.parents_g
    }

    pub fn estimates(&self, num_basics: usize) -> Estimates {
        let gates = self.estimate_gates(num_basics);
        Estimates {
            gates,
            common_basic_events: self.estimate_common_basic_events(gates),
            common_gates: self.estimate_common_gates(gates),
        }
    }
}

fn normalize_input(weights: &[f64]) -> Result<[f64; 5], ConfigError> {
    if weights.len() > 5 {
        return Err(ConfigError::TooManyWeights(weights.len()));
    }
    let mut padded = [0.0; 5];
    for (index, (slot, &value)) in padded.iter_mut().zip(weights).enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidWeight { index, value });
        }
        *slot = value;
    }
    if padded.iter().sum::<f64>() <= 0.0 {
        return Err(ConfigError::ZeroWeights);
    }
    Ok(padded)
}

/// Solve for the upper bound of the child-count range.
///
/// AND, OR and ATLEAST sample uniformly from `[min, max]`, so their mean is
/// `(min + max) / 2`; NOT and XOR contribute their fixed arity.
fn calculate_max_children(avg_children: f64, norm_weights: &[f64; 5]) -> f64 {
    let all = GateType::ALL;
    let (var_types, const_types) = all.split_at(3);
    let contribution = |types: &[GateType]| -> (f64, f64) {
        types.iter().fold((0.0, 0.0), |(weight, contrib), t| {
            let w = norm_weights[t.index()];
            (weight + w, contrib + w * t.min_children() as f64)
        })
    };
    let (var_weight, var_contrib) = contribution(var_types);
    let (_, const_contrib) = contribution(const_types);

    if var_weight <= 0.0 {
        return avg_children;
    }
    (2.0 * avg_children - var_contrib - 2.0 * const_contrib) / var_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn model(avg_children: f64, weights: &[f64]) -> ComplexityModel {
        ComplexityModel::new(avg_children, weights, 0.1, 0.1, 2.0, 2.0).unwrap()
    }

    #[test]
    fn test_max_children_and_or_only() {
        // Mean of [2, max] must be 3.
        assert_eq!(model(3.0, &[1.0, 1.0]).max_children(), 4.0);
    }

    #[test]
    fn test_max_children_with_fixed_arity_types() {
        let m = model(3.0, &[1.0, 1.0, 0.0, 1.0, 1.0]);
        // var: 0.5 weight, 1.0 contrib; const: NOT 0.25, XOR 0.5
        let expected = (6.0 - 1.0 - 2.0 * 0.75) / 0.5;
        assert!((m.max_children() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_expected_child_count_matches_target() {
        let m = model(3.5, &[1.0, 2.0, 1.0, 0.5, 0.5]);
        let mut rng = SmallRng::seed_from_u64(5);
        let samples = 40_000;
        let mut total = 0usize;
        for _ in 0..samples {
            let gate_type = m.sample_gate_type(&mut rng);
            total += m.sample_child_count(gate_type, &mut rng).children;
        }
        let mean = total as f64 / samples as f64;
        assert!((mean - 3.5).abs() < 0.1, "mean was {mean}");
    }

    #[test]
    fn test_ratio_and_percentages() {
        let m = ComplexityModel::new(3.0, &[1.0, 1.0], 0.0, 0.5, 2.0, 2.0).unwrap();
        assert!((m.ratio() - 0.5).abs() < 1e-12);
        assert!((m.percent_basics() - 0.5 / 1.5).abs() < 1e-12);
        assert!((m.percent_gates() - 1.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_weights_padded_and_normalized() {
        let m = model(3.0, &[3.0, 1.0]);
        assert_eq!(m.weights(), &[3.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(m.norm_weights(), &[0.75, 0.25, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_weight_rejections() {
        let err = ComplexityModel::new(3.0, &[0.0, 0.0], 0.1, 0.1, 2.0, 2.0).unwrap_err();
        assert_eq!(err, ConfigError::ZeroWeights);

        let err = ComplexityModel::new(3.0, &[], 0.1, 0.1, 2.0, 2.0).unwrap_err();
        assert_eq!(err, ConfigError::ZeroWeights);

        let err = ComplexityModel::new(3.0, &[1.0; 6], 0.1, 0.1, 2.0, 2.0).unwrap_err();
        assert_eq!(err, ConfigError::TooManyWeights(6));

        let err = ComplexityModel::new(3.0, &[1.0, -1.0], 0.1, 0.1, 2.0, 2.0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidWeight {
                index: 1,
                value: -1.0
            }
        );
    }

    #[test]
    fn test_sample_gate_type_respects_zero_weights() {
        let m = model(3.0, &[0.0, 1.0, 0.0, 0.0, 1.0]);
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..1000 {
            let t = m.sample_gate_type(&mut rng);
            assert!(matches!(t, GateType::Or | GateType::Xor), "sampled {t}");
        }
    }

    #[test]
    fn test_child_count_bounds_per_type() {
        let m = model(4.0, &[1.0, 1.0, 1.0, 1.0, 1.0]);
        let mut rng = SmallRng::seed_from_u64(13);
        for _ in 0..2000 {
            assert_eq!(m.sample_child_count(GateType::Not, &mut rng).children, 1);
            assert_eq!(m.sample_child_count(GateType::Xor, &mut rng).children, 2);

            let and = m.sample_child_count(GateType::And, &mut rng);
            assert!(and.children >= 2);
            assert!(and.k_num.is_none());

            let atleast = m.sample_child_count(GateType::AtLeast, &mut rng);
            let k = atleast.k_num.unwrap();
            assert!(atleast.children >= 3);
            assert!((2..atleast.children).contains(&k));
        }
    }

    #[test]
    fn test_atleast_clamped_when_bound_is_small() {
        // Only ATLEAST with avg 2: the solved bound is 1, below the minimum.
        let m = model(2.0, &[0.0, 0.0, 1.0]);
        assert!(m.max_children() < 3.0);
        let mut rng = SmallRng::seed_from_u64(21);
        let count = m.sample_child_count(GateType::AtLeast, &mut rng);
        assert_eq!(count.children, 3);
        assert_eq!(count.k_num, Some(2));
    }

    #[test]
    fn test_min_basic_events() {
        assert_eq!(model(3.0, &[1.0, 1.0]).min_basic_events(), 2);
        assert_eq!(model(3.0, &[1.0, 0.0, 1.0]).min_basic_events(), 3);
        assert_eq!(model(3.0, &[1.0, 0.0, 0.0, 1.0]).min_basic_events(), 2);
    }

    #[test]
    fn test_can_sample_root() {
        assert!(model(3.0, &[0.0, 1.0]).can_sample_root());
        assert!(!model(3.0, &[0.0, 0.0, 1.0, 1.0]).can_sample_root());
    }

    #[test]
    fn test_estimates() {
        let m = ComplexityModel::new(3.0, &[1.0, 1.0], 0.0, 0.0, 2.0, 2.0).unwrap();
        // ratio 2, percent_basics 2/3, so one gate holds 2 basic events.
        let estimates = m.estimates(10);
        assert!((estimates.gates - 5.0).abs() < 1e-12);
        assert_eq!(estimates.common_basic_events, 0.0);
        assert_eq!(estimates.common_gates, 0.0);
    }
}
