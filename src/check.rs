// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Integrity checking
//!
//! Verifies the structural invariants the rest of the crate relies on:
//! unique ids per scope and agreement between the synapse arena and the
//! endpoint handle lists. Violations are reported through `tracing::error!`
//! and turn the result false; nothing is repaired.

use tracing::error;

use crate::layer::Layer;
use crate::net::Net;
use crate::neuron::{Neuron, NeuronKey};
use crate::synapse::{Synapse, SynapseHandle};
use crate::traverse::{traverse, NetVisitor};

struct CheckVisitor {
    current_layer: i32,
}

impl CheckVisitor {
    fn check_synapse(
        &self,
        net: &Net,
        neuron: &Neuron,
        handle: SynapseHandle,
        synapse: Option<&Synapse>,
        incoming: bool,
    ) -> bool {
        let key = NeuronKey {
            layer: self.current_layer,
            neuron: neuron.id,
        };
        let Some(s) = synapse else {
            error!(?handle, ?key, "synapse handle does not resolve to a live slot");
            return false;
        };
        let (declared, other_end) = if incoming { (s.to, s.from) } else { (s.from, s.to) };
        if declared != key {
            error!(
                ?handle,
                ?key,
                ?declared,
                "synapse endpoint disagrees with the list holding it"
            );
            return false;
        }
        // The synapse must be retrievable by scanning the other endpoint's
        // opposite-direction list.
        let Some(other) = net.neuron(other_end) else {
            error!(?handle, ?other_end, "synapse endpoint neuron does not exist");
            return false;
        };
        let other_list = if incoming { other.outputs() } else { other.inputs() };
        if !other_list.contains(&handle) {
            error!(
                ?handle,
                ?key,
                ?other_end,
                "synapse missing from the opposite endpoint's list"
            );
            return false;
        }
        true
    }
}

impl NetVisitor for CheckVisitor {
    fn visit_layer(&mut self, _net: &Net, layer: &Layer) -> bool {
        self.current_layer = layer.id;
        let mut seen: Vec<i32> = Vec::with_capacity(layer.len());
        for neuron in layer.neurons() {
            if seen.contains(&neuron.id) {
                error!(layer = layer.id, neuron = neuron.id, "duplicate neuron id in layer");
                return false;
            }
            seen.push(neuron.id);
        }
        true
    }

    fn visit_input_synapse(
        &mut self,
        net: &Net,
        neuron: &Neuron,
        handle: SynapseHandle,
        synapse: Option<&Synapse>,
    ) -> bool {
        self.check_synapse(net, neuron, handle, synapse, true)
    }

    fn visit_output_synapse(
        &mut self,
        net: &Net,
        neuron: &Neuron,
        handle: SynapseHandle,
        synapse: Option<&Synapse>,
    ) -> bool {
        self.check_synapse(net, neuron, handle, synapse, false)
    }
}

/// Checks the integrity of a net.
///
/// Returns false on the first violation, after reporting it on the error
/// channel. An empty net passes.
pub fn check_net(net: &Net) -> bool {
    let mut ids: Vec<i32> = Vec::with_capacity(net.num_layers());
    for layer in net.layers() {
        if ids.contains(&layer.id) {
            error!(layer = layer.id, "duplicate layer id in net");
            return false;
        }
        ids.push(layer.id);
    }
    // Every arena slot must be referenced; a live synapse absent from its
    // endpoint lists would otherwise escape the traversal below.
    for (handle, synapse) in net.synapses().iter() {
        let reachable = net
            .neuron(synapse.from)
            .map(|n| n.outputs().contains(&handle))
            .unwrap_or(false);
        if !reachable {
            error!(?handle, from = ?synapse.from, "live synapse unreachable from its source");
            return false;
        }
    }
    traverse(net, &mut CheckVisitor { current_layer: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firing::FiringFunction;

    #[test]
    fn test_empty_net_passes() {
        assert!(check_net(&Net::with_seed(1)));
    }

    #[test]
    fn test_feed_forward_net_passes() {
        let net = Net::feed_forward_with_seed(&[3, 4, 2], 11).unwrap();
        assert!(check_net(&net));
    }

    #[test]
    fn test_broken_input_membership_is_detected() {
        let mut net = Net::with_seed(1);
        let a = net.add_layer();
        let b = net.add_layer();
        let from = net.add_neurons(a, 1, FiringFunction::Input).unwrap();
        let to = net.add_neurons(b, 1, FiringFunction::Sigmoid).unwrap();
        let handle = net.connect(from, to, 1.0).unwrap();
        assert!(check_net(&net));
        // Detach one direction only, leaving the output list dangling.
        assert!(net.neuron_mut(to).unwrap().remove_input(handle));
        assert!(!check_net(&net));
    }

    #[test]
    fn test_broken_output_membership_is_detected() {
        let mut net = Net::with_seed(1);
        let a = net.add_layer();
        let b = net.add_layer();
        let from = net.add_neurons(a, 1, FiringFunction::Input).unwrap();
        let to = net.add_neurons(b, 1, FiringFunction::Sigmoid).unwrap();
        let handle = net.connect(from, to, 1.0).unwrap();
        assert!(net.neuron_mut(from).unwrap().remove_output(handle));
        assert!(!check_net(&net));
    }
}
