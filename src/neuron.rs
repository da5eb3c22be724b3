// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Neurons

use crate::firing::FiringFunction;
use crate::synapse::SynapseHandle;

/// Identifies a neuron by its layer id and its id within that layer.
///
/// Both ids are stable across mutation and across save/load, which is what
/// lets serialized synapse records name neurons that have not been
/// materialized yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeuronKey {
    pub layer: i32,
    pub neuron: i32,
}

/// A node in the network graph.
///
/// A neuron holds handles into the net's synapse arena rather than owning
/// its edges: `inputs` are synapses targeting this neuron, `outputs` are
/// synapses sourced from it. Every live synapse appears in exactly one
/// input list and exactly one output list.
#[derive(Debug, Clone)]
pub struct Neuron {
    /// Unique within the owning layer.
    pub id: i32,
    /// Optional label. Never persisted.
    pub label: Option<String>,
    /// Output of the last evaluation pass.
    pub value: f64,
    /// How this neuron computes its value.
    pub firing: FiringFunction,
    pub(crate) inputs: Vec<SynapseHandle>,
    pub(crate) outputs: Vec<SynapseHandle>,
    /// Assigns ids to outgoing synapses at connect time.
    pub(crate) synapse_ctr: i32,
}

impl Neuron {
    pub(crate) fn new(id: i32, firing: FiringFunction) -> Self {
        Self {
            id,
            label: None,
            value: 0.0,
            firing,
            inputs: Vec::new(),
            outputs: Vec::new(),
            synapse_ctr: 0,
        }
    }

    /// Handles of the synapses targeting this neuron, in creation order.
    pub fn inputs(&self) -> &[SynapseHandle] {
        &self.inputs
    }

    /// Handles of the synapses sourced from this neuron, in creation order.
    pub fn outputs(&self) -> &[SynapseHandle] {
        &self.outputs
    }

    /// Removes a handle from the input list. Returns false if absent.
    ///
    /// This detaches one direction only; [`crate::Net::disconnect`] is the
    /// operation that removes a synapse consistently from both endpoints.
    pub fn remove_input(&mut self, handle: SynapseHandle) -> bool {
        remove_handle(&mut self.inputs, handle)
    }

    /// Removes a handle from the output list. Returns false if absent.
    pub fn remove_output(&mut self, handle: SynapseHandle) -> bool {
        remove_handle(&mut self.outputs, handle)
    }
}

fn remove_handle(list: &mut Vec<SynapseHandle>, handle: SynapseHandle) -> bool {
    match list.iter().position(|h| *h == handle) {
        Some(pos) => {
            list.remove(pos);
            true
        }
        None => false,
    }
}
