// Copyright 2025 Neurograph Contributors
// SPDX-License-Identifier: Apache-2.0

//! Firing functions
//!
//! Each neuron carries a closed tag naming the function that computes its
//! value from its weighted inputs. The tag is what both codecs persist:
//! the text format stores the name, the binary format stores the code.

/// How a neuron computes its value during a feed-forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FiringFunction {
    /// Unrecognized function. Evaluation leaves the value untouched.
    Unknown,
    /// Value is supplied externally and passed through unchanged.
    #[default]
    Input,
    /// Value is fixed at 1.0.
    Bias,
    /// Logistic function over the weighted input sum.
    Sigmoid,
}

impl FiringFunction {
    /// Wire code used by the binary format.
    pub fn code(self) -> i32 {
        match self {
            FiringFunction::Unknown => 0,
            FiringFunction::Input => 1,
            FiringFunction::Bias => 2,
            FiringFunction::Sigmoid => 3,
        }
    }

    /// Maps a binary wire code back to a tag. Unreserved codes map to
    /// `Unknown`, which evaluates as a no-op.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => FiringFunction::Input,
            2 => FiringFunction::Bias,
            3 => FiringFunction::Sigmoid,
            _ => FiringFunction::Unknown,
        }
    }

    /// Name used by the structured-text format.
    pub fn name(self) -> &'static str {
        match self {
            FiringFunction::Unknown => "unknown",
            FiringFunction::Input => "input",
            FiringFunction::Bias => "bias",
            FiringFunction::Sigmoid => "sigmoid",
        }
    }

    /// Maps a serialized name back to a tag. Anything that is not
    /// `"sigmoid"` or `"bias"` loads as `Input`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "sigmoid" => FiringFunction::Sigmoid,
            "bias" => FiringFunction::Bias,
            _ => FiringFunction::Input,
        }
    }
}

/// Standard neuron sigmoid function: 1/(1+exp(-x)).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid function in terms of its output: x*(1-x).
pub fn sigmoid_deriv(x: f64) -> f64 {
    x * (1.0 - x)
}
