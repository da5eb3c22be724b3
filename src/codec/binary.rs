// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Binary codec
//!
//! Compact fixed-width layout, native byte order. Per net: length-prefixed
//! name and description bytes, the layer count, all layer headers
//! (id, neuron count) layer-major, then every neuron (id, firing code) in
//! the same layer order, then a count-prefixed run of synapse records
//! `(layer-from, neuron-from, layer-to, neuron-to, weight)`. A file starts
//! with the net count; nets follow consecutively with no separators.
//!
//! Unlike the text format both synapse endpoints are explicit, but the
//! import is the same two-pass resolution against a transient index. A
//! record cut short by end-of-stream is a hard error, never a benign end.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, NativeEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::codec::ResolutionIndex;
use crate::error::{NetError, Result};
use crate::firing::FiringFunction;
use crate::net::Net;

/// Four i32 endpoint fields plus one f64 weight.
const SYNAPSE_RECORD_BYTES: usize = 4 * 4 + 8;

// ---- export ----------------------------------------------------------

fn write_str<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    writer.write_i32::<NativeEndian>(s.len() as i32)?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

fn write_net<W: Write>(writer: &mut W, net: &Net) -> Result<()> {
    write_str(writer, net.name())?;
    write_str(writer, net.description())?;
    writer.write_i32::<NativeEndian>(net.num_layers() as i32)?;
    for layer in net.layers() {
        writer.write_i32::<NativeEndian>(layer.id)?;
        writer.write_i32::<NativeEndian>(layer.len() as i32)?;
    }
    for layer in net.layers() {
        for neuron in layer.neurons() {
            writer.write_i32::<NativeEndian>(neuron.id)?;
            writer.write_i32::<NativeEndian>(neuron.firing.code())?;
        }
    }
    // Each synapse sits in exactly one output list, so walking the output
    // lists writes each record once.
    writer.write_i32::<NativeEndian>(net.num_synapses() as i32)?;
    for layer in net.layers() {
        for neuron in layer.neurons() {
            for &handle in neuron.outputs() {
                let s = net
                    .synapse(handle)
                    .ok_or(NetError::SynapseNotFound(handle))?;
                writer.write_i32::<NativeEndian>(s.from.layer)?;
                writer.write_i32::<NativeEndian>(s.from.neuron)?;
                writer.write_i32::<NativeEndian>(s.to.layer)?;
                writer.write_i32::<NativeEndian>(s.to.neuron)?;
                writer.write_f64::<NativeEndian>(s.weight)?;
            }
        }
    }
    Ok(())
}

/// Serializes an ordered collection of nets to the binary layout.
pub fn write_nets<W: Write>(writer: &mut W, nets: &[Net]) -> Result<()> {
    writer.write_i32::<NativeEndian>(nets.len() as i32)?;
    for net in nets {
        write_net(writer, net)?;
    }
    Ok(())
}

// ---- import ----------------------------------------------------------

fn read_count<R: Read>(reader: &mut R, what: &str) -> Result<i32> {
    let count = reader.read_i32::<NativeEndian>()?;
    if count < 0 {
        return Err(NetError::Malformed(format!("negative {} count", what)));
    }
    Ok(count)
}

fn read_str<R: Read>(reader: &mut R) -> Result<String> {
    let len = read_count(reader, "string byte")?;
    let mut bytes = vec![0u8; len as usize];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| NetError::Malformed(format!("invalid UTF-8: {}", e)))
}

struct SynapseRecord {
    layer_from: i32,
    neuron_from: i32,
    layer_to: i32,
    neuron_to: i32,
    weight: f64,
}

fn read_synapse_record<R: Read>(reader: &mut R) -> Result<SynapseRecord> {
    let mut buf = [0u8; SYNAPSE_RECORD_BYTES];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            NetError::TruncatedRecord
        } else {
            NetError::Io(e)
        }
    })?;
    Ok(SynapseRecord {
        layer_from: NativeEndian::read_i32(&buf[0..4]),
        neuron_from: NativeEndian::read_i32(&buf[4..8]),
        layer_to: NativeEndian::read_i32(&buf[8..12]),
        neuron_to: NativeEndian::read_i32(&buf[12..16]),
        weight: NativeEndian::read_f64(&buf[16..24]),
    })
}

fn read_net<R: Read>(reader: &mut R) -> Result<Net> {
    let mut net = Net::new();
    let name = read_str(reader)?;
    if !name.is_empty() {
        net.set_name(&name);
    }
    let description = read_str(reader)?;
    if !description.is_empty() {
        net.set_description(&description);
    }

    // Pass one: all layer headers precede all neurons, layer-major.
    let num_layers = read_count(reader, "layer")?;
    let mut headers = Vec::with_capacity(num_layers as usize);
    for _ in 0..num_layers {
        let id = reader.read_i32::<NativeEndian>()?;
        let neurons = read_count(reader, "neuron")?;
        net.add_layer_with_id(id);
        headers.push((id, neurons));
    }
    let mut index = ResolutionIndex::new();
    for (layer_id, count) in headers {
        for _ in 0..count {
            let id = reader.read_i32::<NativeEndian>()?;
            let code = reader.read_i32::<NativeEndian>()?;
            let key = net.add_neuron_with_id(layer_id, id, FiringFunction::from_code(code))?;
            index.insert(key)?;
        }
    }

    // Pass two: the record run, resolved against the index.
    let num_synapses = read_count(reader, "synapse record")?;
    for _ in 0..num_synapses {
        let record = read_synapse_record(reader)?;
        let from = index.resolve(record.layer_from, record.neuron_from)?;
        let to = index.resolve(record.layer_to, record.neuron_to)?;
        net.connect(from, to, record.weight)?;
    }
    Ok(net)
}

/// Deserializes every net in a binary stream, in stored order.
///
/// Failure at any stage aborts the remaining nets and discards everything
/// built during this call.
pub fn read_nets<R: Read>(reader: &mut R) -> Result<Vec<Net>> {
    let count = read_count(reader, "net")?;
    debug!(nets = count, "loading nets from binary stream");
    let mut nets = Vec::with_capacity(count as usize);
    for _ in 0..count {
        nets.push(read_net(reader)?);
    }
    Ok(nets)
}

/// Writes nets to a binary file at `path`.
pub fn save_file<P: AsRef<Path>>(path: P, nets: &[Net]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_nets(&mut writer, nets)
}

/// Reads all nets from a binary file at `path`.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<Net>> {
    let mut reader = BufReader::new(File::open(path)?);
    read_nets(&mut reader)
}
