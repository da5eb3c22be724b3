// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Visitor traversal
//!
//! One eager walk over the whole net: layers in order, neurons in order
//! within each layer, then each neuron's input and output synapses. A
//! visitor returning `false` aborts the walk immediately; nothing is
//! collected. The integrity checker and the diagnostic dump are both built
//! on this.

use std::fmt::{self, Write};

use crate::layer::Layer;
use crate::net::Net;
use crate::neuron::Neuron;
use crate::synapse::{Synapse, SynapseHandle};

/// Per-level callbacks for [`traverse`]. Every method defaults to a pass.
pub trait NetVisitor {
    fn visit_layer(&mut self, _net: &Net, _layer: &Layer) -> bool {
        true
    }

    fn visit_neuron(&mut self, _net: &Net, _layer: &Layer, _neuron: &Neuron) -> bool {
        true
    }

    /// Called for every handle in a neuron's input list. The synapse is
    /// passed when the handle resolves; an unresolvable handle is handed
    /// to the visitor as `None` rather than hidden from it.
    fn visit_input_synapse(
        &mut self,
        _net: &Net,
        _neuron: &Neuron,
        _handle: SynapseHandle,
        _synapse: Option<&Synapse>,
    ) -> bool {
        true
    }

    fn visit_output_synapse(
        &mut self,
        _net: &Net,
        _neuron: &Neuron,
        _handle: SynapseHandle,
        _synapse: Option<&Synapse>,
    ) -> bool {
        true
    }
}

/// Walks the net, short-circuiting on the first visitor failure.
pub fn traverse(net: &Net, visitor: &mut dyn NetVisitor) -> bool {
    for layer in net.layers() {
        if !visitor.visit_layer(net, layer) {
            return false;
        }
        for neuron in layer.neurons() {
            if !visitor.visit_neuron(net, layer, neuron) {
                return false;
            }
            for &handle in neuron.inputs() {
                if !visitor.visit_input_synapse(net, neuron, handle, net.synapse(handle)) {
                    return false;
                }
            }
            for &handle in neuron.outputs() {
                if !visitor.visit_output_synapse(net, neuron, handle, net.synapse(handle)) {
                    return false;
                }
            }
        }
    }
    true
}

struct DumpVisitor<'w> {
    out: &'w mut dyn Write,
    failed: bool,
}

impl DumpVisitor<'_> {
    fn emit(&mut self, args: fmt::Arguments<'_>) -> bool {
        if self.out.write_fmt(args).is_err() {
            self.failed = true;
            return false;
        }
        true
    }
}

impl NetVisitor for DumpVisitor<'_> {
    fn visit_layer(&mut self, _net: &Net, layer: &Layer) -> bool {
        match &layer.label {
            Some(label) => self.emit(format_args!("Layer {}: {}\n", layer.id, label)),
            None => self.emit(format_args!("Layer {}\n", layer.id)),
        }
    }

    fn visit_neuron(&mut self, _net: &Net, _layer: &Layer, neuron: &Neuron) -> bool {
        match &neuron.label {
            Some(label) => self.emit(format_args!("Neuron {} {}\n", neuron.id, label)),
            None => self.emit(format_args!("Neuron {}\n", neuron.id)),
        }
    }

    fn visit_output_synapse(
        &mut self,
        _net: &Net,
        _neuron: &Neuron,
        _handle: SynapseHandle,
        synapse: Option<&Synapse>,
    ) -> bool {
        let Some(s) = synapse else { return true };
        match &s.label {
            Some(label) => self.emit(format_args!(
                "Synapse connected to layer {} neuron {}: {:.2} {}\n",
                s.to.layer, s.to.neuron, s.weight, label
            )),
            None => self.emit(format_args!(
                "Synapse connected to layer {} neuron {}: {:.2}\n",
                s.to.layer, s.to.neuron, s.weight
            )),
        }
    }
}

/// Writes a structure dump of the whole net: name, description, then every
/// layer, neuron and outgoing synapse in traversal order.
pub fn dump_net(net: &Net, out: &mut dyn Write) -> fmt::Result {
    writeln!(out, "Neural network:\t{}", net.name())?;
    if !net.description().is_empty() {
        writeln!(out, "{}", net.description())?;
    }
    let mut visitor = DumpVisitor { out, failed: false };
    traverse(net, &mut visitor);
    if visitor.failed {
        Err(fmt::Error)
    } else {
        Ok(())
    }
}

/// Writes the firing values of every neuron in a layer, usually the last
/// layer after [`Net::process_pattern`].
pub fn dump_layer_outputs(layer: &Layer, out: &mut dyn Write) -> fmt::Result {
    for neuron in layer.neurons() {
        writeln!(out, "Neuron:\t{}\tOutput:\t{:.2}", neuron.id, neuron.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firing::FiringFunction;

    struct Counter {
        layers: usize,
        neurons: usize,
        inputs: usize,
        outputs: usize,
        stop_after_neurons: Option<usize>,
    }

    impl NetVisitor for Counter {
        fn visit_layer(&mut self, _net: &Net, _layer: &Layer) -> bool {
            self.layers += 1;
            true
        }

        fn visit_neuron(&mut self, _net: &Net, _layer: &Layer, _neuron: &Neuron) -> bool {
            self.neurons += 1;
            self.stop_after_neurons != Some(self.neurons)
        }

        fn visit_input_synapse(
            &mut self,
            _net: &Net,
            _neuron: &Neuron,
            _handle: SynapseHandle,
            _synapse: Option<&Synapse>,
        ) -> bool {
            self.inputs += 1;
            true
        }

        fn visit_output_synapse(
            &mut self,
            _net: &Net,
            _neuron: &Neuron,
            _handle: SynapseHandle,
            _synapse: Option<&Synapse>,
        ) -> bool {
            self.outputs += 1;
            true
        }
    }

    fn counter() -> Counter {
        Counter {
            layers: 0,
            neurons: 0,
            inputs: 0,
            outputs: 0,
            stop_after_neurons: None,
        }
    }

    #[test]
    fn test_visits_every_level() {
        let net = Net::feed_forward_with_seed(&[2, 2, 1], 3).unwrap();
        let mut c = counter();
        assert!(traverse(&net, &mut c));
        assert_eq!(c.layers, 4);
        assert_eq!(c.neurons, 6);
        // Each of the 9 synapses is seen once from each direction.
        assert_eq!(c.inputs, 9);
        assert_eq!(c.outputs, 9);
    }

    #[test]
    fn test_short_circuits_on_failure() {
        let net = Net::feed_forward_with_seed(&[2, 2, 1], 3).unwrap();
        let mut c = counter();
        c.stop_after_neurons = Some(2);
        assert!(!traverse(&net, &mut c));
        assert_eq!(c.neurons, 2);
    }

    #[test]
    fn test_dump_contains_structure() {
        let mut net = Net::with_seed(1);
        net.set_name("tiny");
        net.set_description("two neurons");
        let a = net.add_layer();
        let b = net.add_layer();
        let from = net.add_neurons(a, 1, FiringFunction::Input).unwrap();
        let to = net.add_neurons(b, 1, FiringFunction::Sigmoid).unwrap();
        net.connect(from, to, 0.25).unwrap();
        let mut out = String::new();
        dump_net(&net, &mut out).unwrap();
        assert!(out.contains("Neural network:\ttiny"));
        assert!(out.contains("two neurons"));
        assert!(out.contains("Layer 0"));
        assert!(out.contains("Synapse connected to layer 1 neuron 0: 0.25"));
    }
}
