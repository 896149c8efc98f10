//! Property-based tests for execution ordering

use proptest::prelude::*;
use quire::engine::resolver::resolve;
use quire::error::EngineError;
use quire::producer::ProducerDescriptor;
use std::collections::HashMap;

/// Node count, lower-triangular dependency matrix, registration permutation
fn dag_strategy() -> impl Strategy<Value = (usize, Vec<Vec<bool>>, Vec<usize>)> {
    (1usize..12).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(prop::collection::vec(any::<bool>(), n), n),
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
        )
    })
}

fn dag_descriptors(edges: &[Vec<bool>], registration: &[usize]) -> Vec<ProducerDescriptor> {
    registration
        .iter()
        .map(|&i| {
            let needs = (0..i)
                .filter(|&j| edges[i][j])
                .map(|j| format!("p{j}"));
            ProducerDescriptor::new(format!("p{i}"), format!("Producer {i}")).needs(needs)
        })
        .collect()
}

/// Every producer runs after all of its needs, exactly once, in any registration order
#[test]
fn test_order_respects_dependencies() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&dag_strategy(), |(n, edges, registration)| {
            let descriptors = dag_descriptors(&edges, &registration);
            let refs: Vec<&ProducerDescriptor> = descriptors.iter().collect();

            let order = resolve(&refs).unwrap();
            prop_assert_eq!(order.len(), n);

            let position: HashMap<&str, usize> = order
                .iter()
                .enumerate()
                .map(|(pos, id)| (id.as_str(), pos))
                .collect();
            prop_assert_eq!(position.len(), n);

            for descriptor in &descriptors {
                for need in &descriptor.needs {
                    prop_assert!(
                        position[need.as_str()] < position[descriptor.id.as_str()],
                        "{} must run before {}",
                        need,
                        descriptor.id
                    );
                }
            }

            // Same input, same order
            prop_assert_eq!(resolve(&refs).unwrap(), order);
            Ok(())
        })
        .unwrap();
}

/// A ring anywhere in the graph is reported and names one of its members
#[test]
fn test_embedded_ring_is_rejected() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(dag_strategy(), 1usize..5, any::<prop::sample::Index>()),
            |((_, edges, registration), ring_len, insert_at)| {
                let mut descriptors = dag_descriptors(&edges, &registration);
                let ring: Vec<ProducerDescriptor> = (0..ring_len)
                    .map(|k| {
                        let next = (k + 1) % ring_len;
                        ProducerDescriptor::new(format!("r{k}"), format!("Ring {k}"))
                            .needs([format!("r{next}")])
                    })
                    .collect();
                let at = insert_at.index(descriptors.len() + 1);
                descriptors.splice(at..at, ring);

                let refs: Vec<&ProducerDescriptor> = descriptors.iter().collect();
                match resolve(&refs) {
                    Err(EngineError::CircularDependency(id)) => {
                        prop_assert!(id.as_str().starts_with('r'), "{} is not in the ring", id);
                    }
                    other => prop_assert!(false, "expected a cycle error, got {:?}", other),
                }
                Ok(())
            },
        )
        .unwrap();
}
