// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Durable serialization of nets
//!
//! Two formats share one import strategy. Serialized synapse records name
//! their endpoints by `(layer id, neuron id)` and may reference neurons
//! that appear later in the stream, so every import runs in two passes:
//! pass one materializes nets, layers and neurons and registers each
//! neuron in a [`ResolutionIndex`]; pass two resolves every synapse record
//! against the index and connects the endpoints. The index lives for one
//! import call and is dropped with it, success or failure.

use ahash::AHashMap;

use crate::error::{NetError, Result};
use crate::neuron::NeuronKey;

pub mod binary;
pub mod json;

/// Transient `(layer id, neuron id)` -> neuron map built during pass one
/// of an import and consulted during pass two. Never persisted.
pub(crate) struct ResolutionIndex {
    map: AHashMap<(i32, i32), NeuronKey>,
}

impl ResolutionIndex {
    pub(crate) fn new() -> Self {
        Self {
            map: AHashMap::new(),
        }
    }

    /// Registers a materialized neuron. A key seen twice means the input
    /// declares two neurons with the same id, which fails the import.
    pub(crate) fn insert(&mut self, key: NeuronKey) -> Result<()> {
        if self.map.insert((key.layer, key.neuron), key).is_some() {
            return Err(NetError::DuplicateNeuron {
                layer: key.layer,
                neuron: key.neuron,
            });
        }
        Ok(())
    }

    /// Resolves a serialized endpoint reference. A key that was never
    /// registered is a dangling reference and fails the import.
    pub(crate) fn resolve(&self, layer: i32, neuron: i32) -> Result<NeuronKey> {
        self.map
            .get(&(layer, neuron))
            .copied()
            .ok_or(NetError::NeuronNotFound { layer, neuron })
    }
}
