// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Feed-forward evaluation
//!
//! A single forward sweep over the layers in creation order. The graph may
//! contain arbitrary cross-layer synapses; evaluation does not reorder
//! anything, so a synapse from a later layer simply contributes that
//! neuron's value from the previous pass.

use crate::firing::{sigmoid, FiringFunction};
use crate::layer::Layer;
use crate::net::Net;
use crate::neuron::NeuronKey;

impl Net {
    /// Presents an input pattern and computes every neuron value.
    ///
    /// Inputs are copied positionally into the first layer; if the slice
    /// is shorter than the layer, trailing neurons keep their prior value.
    /// Returns the last layer processed, or `None` when the net has fewer
    /// than two layers.
    pub fn process_pattern(&mut self, inputs: &[f64]) -> Option<&Layer> {
        let first = self.layers.first_mut()?;
        for (neuron, value) in first.neurons.iter_mut().zip(inputs) {
            neuron.value = *value;
        }
        for li in 1..self.layers.len() {
            for ni in 0..self.layers[li].neurons.len() {
                let firing = self.layers[li].neurons[ni].firing;
                match firing {
                    FiringFunction::Sigmoid => {
                        let total = self.weighted_input(li, ni);
                        self.layers[li].neurons[ni].value = sigmoid(total);
                    }
                    FiringFunction::Bias => {
                        self.layers[li].neurons[ni].value = 1.0;
                    }
                    // Input passes its value through; Unknown is a no-op.
                    FiringFunction::Input | FiringFunction::Unknown => {}
                }
            }
        }
        if self.layers.len() > 1 {
            self.layers.last()
        } else {
            None
        }
    }

    /// Sum of weight * source value over a neuron's input synapses.
    fn weighted_input(&self, layer_pos: usize, neuron_pos: usize) -> f64 {
        let mut total = 0.0;
        for handle in &self.layers[layer_pos].neurons[neuron_pos].inputs {
            let Some(synapse) = self.synapses.get(*handle) else {
                tracing::debug!(?handle, "skipping dead synapse handle during evaluation");
                continue;
            };
            if let Some(source) = self.neuron(synapse.from) {
                total += synapse.weight * source.value;
            }
        }
        total
    }
}

/// Convenience key-based accessor for a neuron's value after evaluation.
pub fn neuron_value(net: &Net, key: NeuronKey) -> Option<f64> {
    net.neuron(key).map(|n| n.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firing::FiringFunction;

    #[test]
    fn test_single_layer_returns_none() {
        let mut net = Net::with_seed(1);
        let a = net.add_layer();
        net.add_neurons(a, 2, FiringFunction::Input).unwrap();
        assert!(net.process_pattern(&[1.0, 0.0]).is_none());
        // The inputs are still copied in.
        assert_eq!(net.layers()[0].neurons()[0].value, 1.0);
    }

    #[test]
    fn test_short_input_keeps_prior_values() {
        let mut net = Net::with_seed(1);
        let a = net.add_layer();
        let b = net.add_layer();
        net.add_neurons(a, 3, FiringFunction::Input).unwrap();
        net.add_neurons(b, 1, FiringFunction::Bias).unwrap();
        net.process_pattern(&[0.1, 0.2, 0.3]);
        net.process_pattern(&[0.9]);
        let values: Vec<f64> = net.layers()[0].neurons().iter().map(|n| n.value).collect();
        assert_eq!(values, [0.9, 0.2, 0.3]);
    }

    #[test]
    fn test_bias_and_sigmoid() {
        let mut net = Net::with_seed(1);
        let a = net.add_layer();
        let b = net.add_layer();
        let input = net.add_neurons(a, 1, FiringFunction::Input).unwrap();
        let bias = net.add_neurons(b, 1, FiringFunction::Bias).unwrap();
        let c = net.add_layer();
        let out = net.add_neurons(c, 1, FiringFunction::Sigmoid).unwrap();
        net.connect(input, out, 2.0).unwrap();
        net.connect(bias, out, -1.0).unwrap();
        let last = net.process_pattern(&[0.5]).unwrap();
        assert_eq!(last.neurons()[0].value, sigmoid(2.0 * 0.5 - 1.0));
        assert_eq!(neuron_value(&net, bias), Some(1.0));
    }

    #[test]
    fn test_unknown_firing_is_a_no_op() {
        let mut net = Net::with_seed(1);
        let a = net.add_layer();
        let b = net.add_layer();
        net.add_neurons(a, 1, FiringFunction::Input).unwrap();
        let odd = net.add_neurons(b, 1, FiringFunction::Unknown).unwrap();
        net.neuron_mut(odd).unwrap().value = 0.77;
        net.process_pattern(&[1.0]);
        assert_eq!(net.neuron(odd).unwrap().value, 0.77);
    }

    #[test]
    fn test_deterministic_given_fixed_weights() {
        let mut net = Net::feed_forward_with_seed(&[2, 3, 1], 7).unwrap();
        let first = net.process_pattern(&[0.3, 0.8]).unwrap().neurons()[0].value;
        let second = net.process_pattern(&[0.3, 0.8]).unwrap().neurons()[0].value;
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
