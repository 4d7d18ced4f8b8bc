use bivariate_engine::{DiscreteDistribution, JointTable, Support, Variable};
use proptest::prelude::*;

/// Distributions over `0, 1, ..., n - 1` shifted by `offset`, with random weights.
fn distribution() -> impl Strategy<Value = DiscreteDistribution> {
    (prop::collection::vec(0.0f64..10.0, 1..12), -50i32..50).prop_filter_map(
        "needs some positive weight",
        |(weights, offset)| {
            let values = (0i32..)
                .take(weights.len())
                .map(|i| f64::from(offset + i))
                .collect::<Vec<_>>();
            DiscreteDistribution::new(values, weights).ok()
        },
    )
}

fn normalized() -> impl Strategy<Value = DiscreteDistribution> {
    distribution().prop_map(|d| d.normalize().unwrap().0)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9
}

proptest! {
    #[test]
    fn normalized_weights_sum_to_one(dist in distribution()) {
        let (normalized, total) = dist.normalize().unwrap();
        prop_assert!(close(normalized.total_mass(), 1.0));
        prop_assert!(close(total, dist.total_mass()));
        prop_assert!(close(normalized.mean(), dist.mean()));
    }

    #[test]
    fn joint_of_normalized_priors_sums_to_one(p1 in normalized(), p2 in normalized()) {
        let joint = JointTable::build(&p1, &p2).unwrap();
        prop_assert!(close(joint.total_mass(), 1.0));
        prop_assert_eq!(joint.shape(), (p2.len(), p1.len()));
    }

    #[test]
    fn joint_mass_is_product_of_masses(p1 in distribution(), p2 in distribution()) {
        let joint = JointTable::build(&p1, &p2).unwrap();
        let expected = p1.total_mass() * p2.total_mass();
        prop_assert!((joint.total_mass() - expected).abs() <= 1e-9 * expected.max(1.0));
    }

    #[test]
    fn marginals_recover_independent_priors(p1 in normalized(), p2 in normalized()) {
        let joint = JointTable::build(&p1, &p2).unwrap();
        let first = joint.marginal(Variable::First);
        let second = joint.marginal(Variable::Second);
        prop_assert_eq!(first.support(), p1.support());
        prop_assert_eq!(second.support(), p2.support());
        for ((_, a), (_, b)) in first.iter().zip(p1.iter()) {
            prop_assert!(close(a, b));
        }
        for ((_, a), (_, b)) in second.iter().zip(p2.iter()) {
            prop_assert!(close(a, b));
        }
    }

    #[test]
    fn conditionals_of_independent_joint_are_the_other_prior(
        p1 in normalized(),
        p2 in normalized(),
        pick in any::<prop::sample::Index>(),
    ) {
        let joint = JointTable::build(&p1, &p2).unwrap();
        let x = p1.values()[pick.index(p1.len())];
        prop_assume!(p1.probability_at(x).unwrap() > 0.0);
        let given = joint.conditional(Variable::First, x).unwrap();
        for ((_, a), (_, b)) in given.iter().zip(p2.iter()) {
            prop_assert!(close(a, b));
        }
    }

    #[test]
    fn identity_likelihood_leaves_joint_unchanged(p1 in normalized(), p2 in normalized()) {
        let joint = JointTable::build(&p1, &p2).unwrap();
        let ones = joint.likelihood(|_, _| 1.0).unwrap();
        let (posterior, evidence) = joint.update(&ones).unwrap();
        prop_assert!(close(evidence, 1.0));
        for (a, b) in posterior.cells().iter().zip(joint.cells()) {
            prop_assert!(close(*a, *b));
        }
    }

    #[test]
    fn lookups_hit_exactly_the_support(dist in distribution(), probe in -100.0f64..100.0) {
        let support: &Support = dist.support();
        prop_assert_eq!(support.contains(probe), dist.probability_at(probe).is_ok());
    }
}
