//! Dependency resolution: depth-first topological order with cycle detection.

use crate::error::EngineError;
use crate::producer::{ProducerDescriptor, ProducerId};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Finished,
}

/// Order `descriptors` so every producer follows all of its registered needs.
///
/// Traversal is seeded in the given (registration) order, so the result is
/// deterministic. Needs that name unregistered identities are ignored.
pub fn resolve(descriptors: &[&ProducerDescriptor]) -> Result<Vec<ProducerId>, EngineError> {
    let index: HashMap<&str, usize> = descriptors
        .iter()
        .enumerate()
        .map(|(slot, d)| (d.id.as_str(), slot))
        .collect();

    let mut walk = Walk {
        descriptors,
        index,
        marks: vec![Mark::Unvisited; descriptors.len()],
        order: Vec::with_capacity(descriptors.len()),
    };

    for slot in 0..descriptors.len() {
        if walk.marks[slot] == Mark::Unvisited {
            walk.visit(slot)?;
        }
    }
    Ok(walk.order)
}

struct Walk<'a> {
    descriptors: &'a [&'a ProducerDescriptor],
    index: HashMap<&'a str, usize>,
    marks: Vec<Mark>,
    order: Vec<ProducerId>,
}

impl Walk<'_> {
    fn visit(&mut self, slot: usize) -> Result<(), EngineError> {
        self.marks[slot] = Mark::InProgress;
        let descriptor = self.descriptors[slot];

        for need in &descriptor.needs {
            let Some(&dep) = self.index.get(need.as_str()) else {
                warn!(
                    producer = %descriptor.id,
                    missing = %need,
                    "Producer needs an unregistered identity; it will see no output for it"
                );
                continue;
            };
            match self.marks[dep] {
                Mark::Unvisited => self.visit(dep)?,
                Mark::InProgress => return Err(EngineError::CircularDependency(need.clone())),
                Mark::Finished => {}
            }
        }

        self.marks[slot] = Mark::Finished;
        self.order.push(descriptor.id.clone());
        Ok(())
    }
}
