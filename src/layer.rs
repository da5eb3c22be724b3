// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Layers

use crate::firing::FiringFunction;
use crate::neuron::{Neuron, NeuronKey};

/// An ordered group of neurons belonging to one net.
///
/// Position in [`crate::Net::layers`] carries the predecessor/successor
/// relation: the first layer has no predecessor and receives the input
/// pattern, the last layer has no successor and holds the outputs.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Unique within the owning net. Assigned from the net's counter at
    /// append time unless a loader overrides it.
    pub id: i32,
    /// Optional label. Never persisted.
    pub label: Option<String>,
    /// Bounds for randomly generated weights on synapses from this layer.
    pub min_weight: f64,
    pub max_weight: f64,
    pub(crate) neuron_ctr: i32,
    pub(crate) neurons: Vec<Neuron>,
}

impl Layer {
    pub(crate) fn new(id: i32, min_weight: f64, max_weight: f64) -> Self {
        Self {
            id,
            label: None,
            min_weight,
            max_weight,
            neuron_ctr: 0,
            neurons: Vec::new(),
        }
    }

    /// Neurons in creation order.
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Appends one neuron with a counter-assigned id.
    pub fn add_neuron(&mut self, firing: FiringFunction) -> NeuronKey {
        let id = self.neuron_ctr;
        self.neuron_ctr += 1;
        self.neurons.push(Neuron::new(id, firing));
        NeuronKey {
            layer: self.id,
            neuron: id,
        }
    }

    /// Appends `count` neurons, returning the key of the first one added.
    pub fn add_neurons(&mut self, count: usize, firing: FiringFunction) -> Option<NeuronKey> {
        let mut first = None;
        for _ in 0..count {
            let key = self.add_neuron(firing);
            first.get_or_insert(key);
        }
        first
    }

    /// Appends one neuron with an explicit id recovered from serialized
    /// data, advancing the counter past it so later programmatic additions
    /// do not collide.
    pub(crate) fn add_neuron_with_id(&mut self, id: i32, firing: FiringFunction) -> NeuronKey {
        self.neuron_ctr = self.neuron_ctr.max(id + 1);
        self.neurons.push(Neuron::new(id, firing));
        NeuronKey {
            layer: self.id,
            neuron: id,
        }
    }

    pub fn neuron(&self, id: i32) -> Option<&Neuron> {
        self.neurons.iter().find(|n| n.id == id)
    }

    pub fn neuron_mut(&mut self, id: i32) -> Option<&mut Neuron> {
        self.neurons.iter_mut().find(|n| n.id == id)
    }
}
