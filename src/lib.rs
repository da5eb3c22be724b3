// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Neurograph
//!
//! A layered feed-forward neural network graph with dual-format
//! persistence. Each neuron is a standalone node holding edge lists, so
//! arbitrary cross-layer synapses are representable; evaluation is a
//! single forward sweep over the layers in creation order.
//!
//! - **Model**: [`Net`] owns layers, layers own neurons, and all synapses
//!   live in a handle-indexed arena on the net ([`SynapseArena`]).
//! - **Evaluation**: [`Net::process_pattern`] presents an input vector and
//!   fires every neuron per its [`FiringFunction`].
//! - **Traversal**: [`traverse`] walks the graph with per-level visitor
//!   callbacks and short-circuits on failure; [`check_net`] and
//!   [`dump_net`] are built on it.
//! - **Persistence**: [`codec::json`] stores nets as a structured-text
//!   document, [`codec::binary`] as a compact fixed-width stream. Both
//!   imports reconstruct the pointer graph in two passes over the input,
//!   resolving forward references through a transient index.
//!
//! ## Example
//! ```
//! use neurograph::{check_net, codec, Net};
//!
//! let mut net = Net::feed_forward(&[2, 2, 1])?;
//! net.set_name("XOR");
//! assert!(check_net(&net));
//!
//! let mut buf = Vec::new();
//! codec::binary::write_nets(&mut buf, std::slice::from_ref(&net))?;
//! let loaded = codec::binary::read_nets(&mut buf.as_slice())?;
//! assert_eq!(loaded[0].name(), "XOR");
//! # Ok::<(), neurograph::NetError>(())
//! ```
//!
//! No training pass exists; weights are set externally. A `Net` belongs to
//! one thread at a time and performs no locking.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod check;
pub mod codec;
pub mod error;
pub mod evaluate;
pub mod firing;
pub mod layer;
pub mod net;
pub mod neuron;
pub mod synapse;
pub mod traverse;

pub use check::check_net;
pub use error::{NetError, Result};
pub use evaluate::neuron_value;
pub use firing::{sigmoid, sigmoid_deriv, FiringFunction};
pub use layer::Layer;
pub use net::{Net, MAX_WEIGHT, MIN_WEIGHT, UNTITLED};
pub use neuron::{Neuron, NeuronKey};
pub use synapse::{Synapse, SynapseArena, SynapseHandle};
pub use traverse::{dump_layer_outputs, dump_net, traverse, NetVisitor};
