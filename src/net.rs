// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! The network graph
//!
//! A [`Net`] owns its layers, the layers own their neurons, and every
//! synapse lives in a single arena on the net. All mutation goes through
//! the net so that the two endpoint handle lists and the arena can never
//! disagree: a synapse is linked into both lists only after its slot
//! exists, and its slot is freed only after it has been removed from both
//! lists.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{NetError, Result};
use crate::firing::FiringFunction;
use crate::layer::Layer;
use crate::neuron::{Neuron, NeuronKey};
use crate::synapse::{Synapse, SynapseArena, SynapseHandle};

/// Default bounds for randomly generated synapse weights.
pub const MIN_WEIGHT: f64 = -10.0;
pub const MAX_WEIGHT: f64 = 10.0;

/// Name given to a net until one is set.
pub const UNTITLED: &str = "Untitled";

/// A named, described, ordered collection of layers plus the synapse arena.
#[derive(Debug, Clone)]
pub struct Net {
    name: String,
    description: String,
    pub(crate) layers: Vec<Layer>,
    layer_ctr: i32,
    /// Default weight bounds handed to newly created layers.
    pub min_weight: f64,
    pub max_weight: f64,
    pub(crate) synapses: SynapseArena,
    rng: StdRng,
}

impl Default for Net {
    fn default() -> Self {
        Self::new()
    }
}

impl Net {
    /// Creates an empty net with entropy-seeded weight generation.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Creates an empty net with a fixed weight-generation seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            name: UNTITLED.to_string(),
            description: String::new(),
            layers: Vec::new(),
            layer_ctr: 0,
            min_weight: MIN_WEIGHT,
            max_weight: MAX_WEIGHT,
            synapses: SynapseArena::new(),
            rng,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn set_weight_bounds(&mut self, min_weight: f64, max_weight: f64) {
        self.min_weight = min_weight;
        self.max_weight = max_weight;
    }

    // ---- layers ------------------------------------------------------

    /// Layers in evaluation order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Appends a layer with a counter-assigned id and returns the id.
    pub fn add_layer(&mut self) -> i32 {
        let id = self.next_layer_id();
        let layer = self.blank_layer(id);
        self.layers.push(layer);
        id
    }

    /// Inserts a layer before every existing one and returns its id.
    pub fn prepend_layer(&mut self) -> i32 {
        let id = self.next_layer_id();
        let layer = self.blank_layer(id);
        self.layers.insert(0, layer);
        id
    }

    /// Inserts a layer directly after the layer with id `after`.
    pub fn insert_layer_after(&mut self, after: i32) -> Result<i32> {
        let pos = self
            .layers
            .iter()
            .position(|l| l.id == after)
            .ok_or(NetError::LayerNotFound(after))?;
        let id = self.next_layer_id();
        let layer = self.blank_layer(id);
        self.layers.insert(pos + 1, layer);
        Ok(id)
    }

    /// Appends a layer with an explicit id recovered from serialized data,
    /// advancing the counter past it.
    pub(crate) fn add_layer_with_id(&mut self, id: i32) {
        self.layer_ctr = self.layer_ctr.max(id + 1);
        let layer = self.blank_layer(id);
        self.layers.push(layer);
    }

    fn next_layer_id(&mut self) -> i32 {
        let id = self.layer_ctr;
        self.layer_ctr += 1;
        id
    }

    fn blank_layer(&self, id: i32) -> Layer {
        Layer::new(id, self.min_weight, self.max_weight)
    }

    pub fn layer(&self, id: i32) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: i32) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn first_layer(&self) -> Option<&Layer> {
        self.layers.first()
    }

    pub fn last_layer(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// Unlinks a layer and destroys all its neurons and their synapses.
    pub fn destroy_layer(&mut self, id: i32) -> Result<()> {
        let layer = self.layer(id).ok_or(NetError::LayerNotFound(id))?;
        let keys: Vec<NeuronKey> = layer
            .neurons()
            .iter()
            .map(|n| NeuronKey {
                layer: id,
                neuron: n.id,
            })
            .collect();
        for key in keys {
            self.destroy_neuron(key)?;
        }
        self.layers.retain(|l| l.id != id);
        Ok(())
    }

    // ---- neurons -----------------------------------------------------

    /// Appends `count` neurons to the given layer, returning the key of
    /// the first one added.
    pub fn add_neurons(
        &mut self,
        layer_id: i32,
        count: usize,
        firing: FiringFunction,
    ) -> Result<NeuronKey> {
        let layer = self
            .layer_mut(layer_id)
            .ok_or(NetError::LayerNotFound(layer_id))?;
        layer
            .add_neurons(count, firing)
            .ok_or_else(|| NetError::Malformed("cannot add zero neurons".into()))
    }

    /// Appends one neuron with an explicit id recovered from serialized data.
    pub(crate) fn add_neuron_with_id(
        &mut self,
        layer_id: i32,
        id: i32,
        firing: FiringFunction,
    ) -> Result<NeuronKey> {
        let layer = self
            .layer_mut(layer_id)
            .ok_or(NetError::LayerNotFound(layer_id))?;
        Ok(layer.add_neuron_with_id(id, firing))
    }

    /// Finds a neuron by its `(layer id, neuron id)` key.
    pub fn neuron(&self, key: NeuronKey) -> Option<&Neuron> {
        self.layer(key.layer)?.neuron(key.neuron)
    }

    pub fn neuron_mut(&mut self, key: NeuronKey) -> Option<&mut Neuron> {
        self.layer_mut(key.layer)?.neuron_mut(key.neuron)
    }

    /// Finds a neuron by zero-based layer position and neuron position.
    pub fn neuron_by_pos(&self, layer_pos: usize, neuron_pos: usize) -> Option<&Neuron> {
        self.layers.get(layer_pos)?.neurons().get(neuron_pos)
    }

    /// Key of the neuron at the given positions.
    pub fn key_by_pos(&self, layer_pos: usize, neuron_pos: usize) -> Option<NeuronKey> {
        let layer = self.layers.get(layer_pos)?;
        let neuron = layer.neurons().get(neuron_pos)?;
        Some(NeuronKey {
            layer: layer.id,
            neuron: neuron.id,
        })
    }

    /// Destroys a neuron together with all its input and output synapses.
    ///
    /// Every attached synapse is removed from both endpoint lists before
    /// its arena slot is freed, so the other endpoints are never left
    /// holding a dangling handle.
    pub fn destroy_neuron(&mut self, key: NeuronKey) -> Result<()> {
        let neuron = self.neuron(key).ok_or(NetError::NeuronNotFound {
            layer: key.layer,
            neuron: key.neuron,
        })?;
        let mut handles: Vec<SynapseHandle> = neuron.inputs().to_vec();
        for h in neuron.outputs() {
            // A self-loop appears in both lists but must be freed once.
            if !handles.contains(h) {
                handles.push(*h);
            }
        }
        for h in handles {
            self.disconnect(h)?;
        }
        let layer = self
            .layer_mut(key.layer)
            .ok_or(NetError::LayerNotFound(key.layer))?;
        layer.neurons.retain(|n| n.id != key.neuron);
        Ok(())
    }

    // ---- synapses ----------------------------------------------------

    pub fn synapses(&self) -> &SynapseArena {
        &self.synapses
    }

    pub fn num_synapses(&self) -> usize {
        self.synapses.len()
    }

    pub fn synapse(&self, handle: SynapseHandle) -> Option<&Synapse> {
        self.synapses.get(handle)
    }

    /// Connects two neurons with a weighted synapse and returns its handle.
    ///
    /// Both endpoints are resolved before anything is allocated, so a
    /// failed connect leaves the graph untouched.
    pub fn connect(&mut self, from: NeuronKey, to: NeuronKey, weight: f64) -> Result<SynapseHandle> {
        if self.neuron(to).is_none() {
            return Err(NetError::NeuronNotFound {
                layer: to.layer,
                neuron: to.neuron,
            });
        }
        let id = {
            let source = self.neuron_mut(from).ok_or(NetError::NeuronNotFound {
                layer: from.layer,
                neuron: from.neuron,
            })?;
            let id = source.synapse_ctr;
            source.synapse_ctr += 1;
            id
        };
        let handle = self.synapses.insert(Synapse {
            id,
            label: None,
            from,
            to,
            weight,
        });
        // Both neurons were just resolved; the pushes cannot fail.
        if let Some(source) = self.neuron_mut(from) {
            source.outputs.push(handle);
        }
        if let Some(target) = self.neuron_mut(to) {
            target.inputs.push(handle);
        }
        Ok(handle)
    }

    /// Destroys a synapse: removes it from both endpoint lists and frees
    /// its arena slot exactly once.
    pub fn disconnect(&mut self, handle: SynapseHandle) -> Result<()> {
        let (from, to) = {
            let s = self
                .synapses
                .get(handle)
                .ok_or(NetError::SynapseNotFound(handle))?;
            (s.from, s.to)
        };
        if let Some(source) = self.neuron_mut(from) {
            source.remove_output(handle);
        }
        if let Some(target) = self.neuron_mut(to) {
            target.remove_input(handle);
        }
        self.synapses.remove(handle);
        Ok(())
    }

    /// Handle of the synapse from one neuron to another, if any.
    pub fn synapse_between(&self, from: NeuronKey, to: NeuronKey) -> Option<SynapseHandle> {
        let source = self.neuron(from)?;
        source
            .outputs()
            .iter()
            .copied()
            .find(|h| self.synapses.get(*h).map(|s| s.to) == Some(to))
    }

    pub fn set_synapse_weight(&mut self, handle: SynapseHandle, weight: f64) -> Result<()> {
        let s = self
            .synapses
            .get_mut(handle)
            .ok_or(NetError::SynapseNotFound(handle))?;
        s.weight = weight;
        Ok(())
    }

    /// Adds a delta to a synapse weight.
    pub fn adjust_synapse_weight(&mut self, handle: SynapseHandle, delta: f64) -> Result<()> {
        let s = self
            .synapses
            .get_mut(handle)
            .ok_or(NetError::SynapseNotFound(handle))?;
        s.weight += delta;
        Ok(())
    }

    /// Random weight in the semi-open range [min, max).
    fn random_weight(&mut self, min: f64, max: f64) -> f64 {
        self.rng.gen::<f64>() * (max - min) + min
    }

    /// Connects every neuron in `from` to every neuron in `to`, with
    /// weights drawn from the source layer's bounds.
    pub fn connect_layers(&mut self, from: i32, to: i32) -> Result<()> {
        let (min, max) = {
            let layer = self.layer(from).ok_or(NetError::LayerNotFound(from))?;
            (layer.min_weight, layer.max_weight)
        };
        let sources: Vec<NeuronKey> = self
            .layer(from)
            .ok_or(NetError::LayerNotFound(from))?
            .neurons()
            .iter()
            .map(|n| NeuronKey {
                layer: from,
                neuron: n.id,
            })
            .collect();
        let targets: Vec<NeuronKey> = self
            .layer(to)
            .ok_or(NetError::LayerNotFound(to))?
            .neurons()
            .iter()
            .map(|n| NeuronKey {
                layer: to,
                neuron: n.id,
            })
            .collect();
        for s in &sources {
            for t in &targets {
                let weight = self.random_weight(min, max);
                self.connect(*s, *t, weight)?;
            }
        }
        Ok(())
    }

    // ---- builders ----------------------------------------------------

    /// Builds a fully connected feed-forward net.
    ///
    /// `sizes[0]` is the input layer, the remaining entries are sigmoid
    /// layers. A single-neuron bias layer sits between the input layer and
    /// the first hidden layer and is connected to every sigmoid layer.
    pub fn feed_forward(sizes: &[usize]) -> Result<Net> {
        Self::feed_forward_from(Net::new(), sizes)
    }

    /// [`Net::feed_forward`] with a fixed weight-generation seed.
    pub fn feed_forward_with_seed(sizes: &[usize], seed: u64) -> Result<Net> {
        Self::feed_forward_from(Net::with_seed(seed), sizes)
    }

    fn feed_forward_from(mut net: Net, sizes: &[usize]) -> Result<Net> {
        if sizes.is_empty() {
            return Err(NetError::Malformed(
                "feed-forward net needs at least an input layer".into(),
            ));
        }
        let input = net.add_layer();
        net.add_neurons(input, sizes[0], FiringFunction::Input)?;
        let bias = net.add_layer();
        net.add_neurons(bias, 1, FiringFunction::Bias)?;
        let mut prev = bias;
        for (i, &size) in sizes.iter().enumerate().skip(1) {
            let curr = net.add_layer();
            net.add_neurons(curr, size, FiringFunction::Sigmoid)?;
            net.connect_layers(prev, curr)?;
            if i == 1 {
                net.connect_layers(input, curr)?;
            } else {
                net.connect_layers(bias, curr)?;
            }
            prev = curr;
        }
        Ok(net)
    }
}
