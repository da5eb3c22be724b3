// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Synapses and the synapse arena
//!
//! Synapses are not owned by either endpoint. They live in a slot arena on
//! the net and both endpoints hold stable handles into it. A slot is freed
//! exactly once, after the handle has been removed from the source neuron's
//! output list and the target neuron's input list.

use crate::neuron::NeuronKey;

/// Stable handle to a synapse slot in a [`SynapseArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SynapseHandle(pub(crate) u32);

/// A directed, weighted edge between two neurons.
#[derive(Debug, Clone)]
pub struct Synapse {
    /// Unique among the source neuron's outgoing synapses, not globally.
    pub id: i32,
    /// Optional label. Never persisted.
    pub label: Option<String>,
    /// Source neuron.
    pub from: NeuronKey,
    /// Target neuron.
    pub to: NeuronKey,
    /// Weight applied to the source value during evaluation.
    pub weight: f64,
}

/// Slot arena holding every synapse of one net.
///
/// Freed slots go on a free list and are reused by later inserts, so a
/// handle is only stable while its synapse is live.
#[derive(Debug, Clone, Default)]
pub struct SynapseArena {
    slots: Vec<Option<Synapse>>,
    free: Vec<u32>,
    live: usize,
}

impl SynapseArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live synapses.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Stores a synapse and returns its handle.
    pub fn insert(&mut self, synapse: Synapse) -> SynapseHandle {
        self.live += 1;
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(synapse);
                SynapseHandle(slot)
            }
            None => {
                self.slots.push(Some(synapse));
                SynapseHandle((self.slots.len() - 1) as u32)
            }
        }
    }

    /// Frees a slot, returning the synapse that occupied it.
    pub fn remove(&mut self, handle: SynapseHandle) -> Option<Synapse> {
        let synapse = self.slots.get_mut(handle.0 as usize)?.take()?;
        self.free.push(handle.0);
        self.live -= 1;
        Some(synapse)
    }

    pub fn get(&self, handle: SynapseHandle) -> Option<&Synapse> {
        self.slots.get(handle.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, handle: SynapseHandle) -> Option<&mut Synapse> {
        self.slots.get_mut(handle.0 as usize)?.as_mut()
    }

    /// Iterates over live slots in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (SynapseHandle, &Synapse)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|s| (SynapseHandle(i as u32), s)))
    }
}
