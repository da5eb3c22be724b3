// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for network model and codec operations

use crate::synapse::SynapseHandle;
use thiserror::Error;

/// Errors produced by graph mutation and by the text/binary codecs.
#[derive(Error, Debug)]
pub enum NetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("layer {0} not found")]
    LayerNotFound(i32),

    #[error("neuron ({layer}, {neuron}) not found")]
    NeuronNotFound { layer: i32, neuron: i32 },

    #[error("synapse {0:?} is not live")]
    SynapseNotFound(SynapseHandle),

    #[error("duplicate neuron id ({layer}, {neuron})")]
    DuplicateNeuron { layer: i32, neuron: i32 },

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("truncated synapse record")]
    TruncatedRecord,
}

pub type Result<T> = std::result::Result<T, NetError>;
