// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! The classic XOR network with hand-trained weights, evaluated directly
//! and again after a round trip through each persistence format.

use approx::assert_abs_diff_eq;
use neurograph::{check_net, codec, Net};

const PATTERNS: [[f64; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
const EXPECTED: [f64; 4] = [0.1, 0.9, 0.9, 0.1];

/// Feed-forward [2, 2, 1] net: layer 0 inputs, layer 1 bias, layer 2
/// hidden sigmoids, layer 3 output sigmoid, with the weights fixed to a
/// known XOR solution.
fn xor_net() -> Net {
    let mut net = Net::feed_forward_with_seed(&[2, 2, 1], 123).unwrap();
    assert!(check_net(&net));

    let set = |net: &mut Net, from: (usize, usize), to: (usize, usize), weight: f64| {
        let from = net.key_by_pos(from.0, from.1).unwrap();
        let to = net.key_by_pos(to.0, to.1).unwrap();
        let handle = net.synapse_between(from, to).unwrap();
        net.set_synapse_weight(handle, weight).unwrap();
    };

    // Bias connections
    set(&mut net, (1, 0), (2, 0), -2.82);
    set(&mut net, (1, 0), (2, 1), -2.74);
    set(&mut net, (1, 0), (3, 0), -2.86);
    // Input to hidden
    set(&mut net, (0, 0), (2, 0), 4.83);
    set(&mut net, (0, 0), (2, 1), -4.63);
    set(&mut net, (0, 1), (2, 0), -4.83);
    set(&mut net, (0, 1), (2, 1), 4.6);
    // Hidden to output
    set(&mut net, (2, 0), (3, 0), 5.73);
    set(&mut net, (2, 1), (3, 0), 5.83);

    assert!(check_net(&net));
    net
}

fn assert_solves_xor(net: &mut Net) {
    for (pattern, expected) in PATTERNS.iter().zip(EXPECTED) {
        let output = net.process_pattern(pattern).unwrap().neurons()[0].value;
        assert_abs_diff_eq!(output, expected, epsilon = 0.01);
    }
}

#[test]
fn test_xor_evaluation() {
    let mut net = xor_net();
    assert_solves_xor(&mut net);
}

#[test]
fn test_xor_survives_json_round_trip() {
    let mut net = xor_net();
    net.set_name("XOR");
    let mut buf = Vec::new();
    codec::json::write_nets(&mut buf, std::slice::from_ref(&net)).unwrap();
    let mut loaded = codec::json::read_nets(buf.as_slice()).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name(), "XOR");
    assert!(check_net(&loaded[0]));
    assert_solves_xor(&mut loaded[0]);
}

#[test]
fn test_xor_survives_binary_round_trip() {
    let mut net = xor_net();
    net.set_name("XOR");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xor.bin");
    codec::binary::save_file(&path, std::slice::from_ref(&net)).unwrap();
    let mut loaded = codec::binary::load_file(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(check_net(&loaded[0]));
    assert_solves_xor(&mut loaded[0]);
}
