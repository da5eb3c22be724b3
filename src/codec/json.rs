// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Structured-text codec
//!
//! One JSON document holds an ordered array of nets. Synapses are stored
//! on their *target* neuron as `{layer-from, neuron-from, weight}` triples;
//! the target itself is implicit in the enclosing neuron object.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::ResolutionIndex;
use crate::error::Result;
use crate::firing::FiringFunction;
use crate::net::Net;

#[derive(Debug, Serialize, Deserialize)]
struct JsonNet {
    #[serde(rename = "ann-name", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "ann-description", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layers: Option<Vec<JsonLayer>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonLayer {
    #[serde(rename = "layer-id")]
    id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    neurons: Option<Vec<JsonNeuron>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonNeuron {
    #[serde(rename = "neuron-id")]
    id: i32,
    #[serde(rename = "firing-function", skip_serializing_if = "Option::is_none")]
    firing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    synapses: Option<Vec<JsonSynapse>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonSynapse {
    #[serde(rename = "layer-from")]
    layer_from: i32,
    #[serde(rename = "neuron-from")]
    neuron_from: i32,
    weight: f64,
}

// ---- export ----------------------------------------------------------

fn net_to_json(net: &Net) -> Result<JsonNet> {
    let mut layers = Vec::with_capacity(net.num_layers());
    for layer in net.layers() {
        let mut neurons = Vec::with_capacity(layer.len());
        for neuron in layer.neurons() {
            let mut synapses = Vec::with_capacity(neuron.inputs().len());
            for &handle in neuron.inputs() {
                let s = net
                    .synapse(handle)
                    .ok_or(crate::error::NetError::SynapseNotFound(handle))?;
                synapses.push(JsonSynapse {
                    layer_from: s.from.layer,
                    neuron_from: s.from.neuron,
                    weight: s.weight,
                });
            }
            neurons.push(JsonNeuron {
                id: neuron.id,
                firing: Some(neuron.firing.name().to_string()),
                synapses: if synapses.is_empty() {
                    None
                } else {
                    Some(synapses)
                },
            });
        }
        layers.push(JsonLayer {
            id: layer.id,
            neurons: if neurons.is_empty() {
                None
            } else {
                Some(neurons)
            },
        });
    }
    Ok(JsonNet {
        name: Some(net.name().to_string()),
        description: if net.description().is_empty() {
            None
        } else {
            Some(net.description().to_string())
        },
        layers: if layers.is_empty() { None } else { Some(layers) },
    })
}

/// Serializes an ordered collection of nets as one pretty-printed JSON
/// document.
pub fn write_nets<W: Write>(writer: &mut W, nets: &[Net]) -> Result<()> {
    let document: Vec<JsonNet> = nets.iter().map(net_to_json).collect::<Result<_>>()?;
    serde_json::to_writer_pretty(&mut *writer, &document)?;
    writer.write_all(b"\n")?;
    Ok(())
}

// ---- import ----------------------------------------------------------

fn net_from_json(jnet: &JsonNet) -> Result<Net> {
    let mut net = Net::new();
    if let Some(name) = &jnet.name {
        net.set_name(name);
    }
    if let Some(description) = &jnet.description {
        net.set_description(description);
    }
    let Some(jlayers) = &jnet.layers else {
        return Ok(net);
    };

    // Pass one: materialize layers and neurons under their stored ids and
    // register every neuron in the resolution index.
    let mut index = ResolutionIndex::new();
    for jlayer in jlayers {
        net.add_layer_with_id(jlayer.id);
        for jneuron in jlayer.neurons.iter().flatten() {
            let firing = jneuron
                .firing
                .as_deref()
                .map(FiringFunction::from_name)
                .unwrap_or_default();
            let key = net.add_neuron_with_id(jlayer.id, jneuron.id, firing)?;
            index.insert(key)?;
        }
    }

    // Pass two: connect. The source may live anywhere, including a layer
    // that appeared later in the document; the index resolves it either way.
    for jlayer in jlayers {
        for jneuron in jlayer.neurons.iter().flatten() {
            let to = index.resolve(jlayer.id, jneuron.id)?;
            for jsynapse in jneuron.synapses.iter().flatten() {
                let from = index.resolve(jsynapse.layer_from, jsynapse.neuron_from)?;
                net.connect(from, to, jsynapse.weight)?;
            }
        }
    }
    Ok(net)
}

/// Deserializes every net in a JSON document, in document order.
///
/// Any failure discards all nets built during this call.
pub fn read_nets<R: Read>(reader: R) -> Result<Vec<Net>> {
    let document: Vec<JsonNet> = serde_json::from_reader(reader)?;
    debug!(nets = document.len(), "loading nets from JSON document");
    let mut nets = Vec::with_capacity(document.len());
    for jnet in &document {
        nets.push(net_from_json(jnet)?);
    }
    Ok(nets)
}

/// Writes nets to a JSON file at `path`.
pub fn save_file<P: AsRef<Path>>(path: P, nets: &[Net]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_nets(&mut writer, nets)
}

/// Reads all nets from a JSON file at `path`.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<Net>> {
    read_nets(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetError;
    use crate::firing::FiringFunction;

    fn to_string(nets: &[Net]) -> String {
        let mut buf = Vec::new();
        write_nets(&mut buf, nets).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_export_field_shape() {
        let mut net = Net::with_seed(1);
        net.set_name("shape");
        let a = net.add_layer();
        let b = net.add_layer();
        let from = net.add_neurons(a, 1, FiringFunction::Input).unwrap();
        let to = net.add_neurons(b, 1, FiringFunction::Sigmoid).unwrap();
        net.connect(from, to, 0.5).unwrap();
        let text = to_string(&[net]);
        assert!(text.contains("\"ann-name\": \"shape\""));
        // Empty description is omitted entirely.
        assert!(!text.contains("ann-description"));
        assert!(text.contains("\"firing-function\": \"sigmoid\""));
        assert!(text.contains("\"layer-from\": 0"));
        assert!(text.contains("\"neuron-from\": 0"));
        // The input neuron has no incoming synapses, so no synapses array.
        let input_obj = text.split("\"input\"").next().unwrap();
        assert!(!input_obj.contains("synapses"));
    }

    #[test]
    fn test_forward_reference_resolves() {
        // The synapse on the first layer's neuron names a source in the
        // second layer, which does not exist yet during pass one.
        let text = r#"[{
            "ann-name": "forward",
            "layers": [
                {"layer-id": 0, "neurons": [
                    {"neuron-id": 0, "firing-function": "sigmoid",
                     "synapses": [{"layer-from": 1, "neuron-from": 0, "weight": 2.5}]}
                ]},
                {"layer-id": 1, "neurons": [
                    {"neuron-id": 0, "firing-function": "input"}
                ]}
            ]
        }]"#;
        let nets = read_nets(text.as_bytes()).unwrap();
        assert_eq!(nets.len(), 1);
        assert_eq!(nets[0].num_synapses(), 1);
        assert!(crate::check::check_net(&nets[0]));
    }

    #[test]
    fn test_duplicate_neuron_id_fails_import() {
        let text = r#"[{
            "layers": [
                {"layer-id": 0, "neurons": [
                    {"neuron-id": 3}, {"neuron-id": 3}
                ]}
            ]
        }]"#;
        assert!(matches!(
            read_nets(text.as_bytes()),
            Err(NetError::DuplicateNeuron { layer: 0, neuron: 3 })
        ));
    }

    #[test]
    fn test_dangling_source_fails_import() {
        let text = r#"[{
            "layers": [
                {"layer-id": 0, "neurons": [
                    {"neuron-id": 0,
                     "synapses": [{"layer-from": 7, "neuron-from": 7, "weight": 1.0}]}
                ]}
            ]
        }]"#;
        assert!(matches!(
            read_nets(text.as_bytes()),
            Err(NetError::NeuronNotFound { layer: 7, neuron: 7 })
        ));
    }

    #[test]
    fn test_missing_neuron_id_fails_import() {
        let text = r#"[{"layers": [{"layer-id": 0, "neurons": [{"firing-function": "bias"}]}]}]"#;
        assert!(matches!(read_nets(text.as_bytes()), Err(NetError::Json(_))));
    }

    #[test]
    fn test_absent_firing_function_defaults_to_input() {
        let text = r#"[{"layers": [{"layer-id": 2, "neurons": [{"neuron-id": 5}]}]}]"#;
        let nets = read_nets(text.as_bytes()).unwrap();
        let neuron = nets[0].layers()[0].neurons().first().unwrap();
        assert_eq!(neuron.firing, FiringFunction::Input);
        assert_eq!(neuron.id, 5);
        assert_eq!(nets[0].layers()[0].id, 2);
    }
}
