//! Property tests over randomly drawn valid configurations.

use fault_tree_gen::{generate, validate_tree, GateType, GeneratorConfig};
use proptest::prelude::*;

fn config_strategy() -> impl Strategy<Value = GeneratorConfig> {
    (
        any::<u64>(),
        3usize..80,
        2.0f64..5.0,
        0.0f64..0.5,
        0.0f64..0.45,
        0.1f64..1.0,
        prop::collection::vec(0.0f64..1.0, 4),
        0usize..4,
    )
        .prop_map(
            |(seed, basics, children, common_b, common_g, and_weight, rest, ccf)| {
                let mut weights = vec![and_weight];
                weights.extend(rest);
                let ccf = ccf.min((basics as f64 / children) as usize);
                GeneratorConfig::default()
                    .with_seed(seed)
                    .with_basics(basics)
                    .with_children(children)
                    .with_common_b(common_b)
                    .with_common_g(common_g)
                    .with_weights(weights)
                    .with_ccf(ccf)
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_generated_tree_is_valid(config in config_strategy()) {
        let generated = generate(&config).unwrap();
        let report = validate_tree(&generated, &config);
        prop_assert!(report.is_valid(), "{:?}", report.violations);
        prop_assert_eq!(generated.tree().num_basic_events(), config.basics);
    }

    #[test]
    fn prop_root_is_and_or(config in config_strategy()) {
        let generated = generate(&config).unwrap();
        let tree = generated.tree();
        let root_type = tree.gate(tree.root()).gate_type();
        prop_assert!(matches!(root_type, GateType::And | GateType::Or));
    }

    #[test]
    fn prop_generation_is_deterministic(config in config_strategy()) {
        prop_assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
    }
}
