//! Producer registry: in-memory collection keyed by identity.

use crate::engine::resolver;
use crate::error::EngineError;
use crate::producer::{Producer, ProducerDescriptor, ProducerId};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Registered producers in registration order, plus the cached execution order.
pub struct Registry {
    producers: Vec<Arc<dyn Producer>>,
    index: HashMap<ProducerId, usize>,
    order: Mutex<Option<Vec<ProducerId>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            producers: Vec::new(),
            index: HashMap::new(),
            order: Mutex::new(None),
        }
    }

    /// Register a producer. A duplicate identity is rejected and leaves the
    /// registry untouched.
    pub fn register(&mut self, producer: Arc<dyn Producer>) -> Result<(), EngineError> {
        let id = producer.descriptor().id.clone();
        if self.index.contains_key(&id) {
            return Err(EngineError::DuplicateIdentity(id));
        }
        debug!(producer = %id, needs = ?producer.descriptor().needs, "Producer registered");
        self.index.insert(id, self.producers.len());
        self.producers.push(producer);
        *self.order.lock() = None;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Producer>> {
        self.index.get(id).map(|&slot| &self.producers[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> Vec<&ProducerDescriptor> {
        self.producers.iter().map(|p| p.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Union of every registered producer's sensitive settings fields
    pub fn sensitive_fields(&self) -> BTreeSet<String> {
        self.producers
            .iter()
            .flat_map(|p| p.descriptor().sensitive_fields.iter().cloned())
            .collect()
    }

    /// Dependency-respecting execution order, computed once per registration set
    pub fn execution_order(&self) -> Result<Vec<ProducerId>, EngineError> {
        let mut cached = self.order.lock();
        if let Some(order) = cached.as_ref() {
            return Ok(order.clone());
        }
        let order = resolver::resolve(&self.descriptors())?;
        *cached = Some(order.clone());
        Ok(order)
    }

    #[cfg(test)]
    pub(crate) fn has_cached_order(&self) -> bool {
        self.order.lock().is_some()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
