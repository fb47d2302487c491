use serde::{Deserialize, Serialize};

use super::activation::ActivationKind;
use super::neuron::Neuron;
use crate::errors::{NetError, Result};

/// Neurons at the same depth, all reading the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub neurons: Vec<Neuron>,
}

impl Layer {
    pub fn new(neurons: Vec<Neuron>) -> Self {
        Self { neurons }
    }

    /// `size` zeroed neurons with `n_inputs` weights each.
    pub fn zeroed(size: usize, n_inputs: usize) -> Self {
        Self {
            neurons: (0..size).map(|_| Neuron::new(n_inputs)).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Width of the input every neuron expects (0 for an empty layer).
    pub fn input_width(&self) -> usize {
        self.neurons.first().map(Neuron::input_width).unwrap_or(0)
    }

    /// Pre-activation value of every neuron.
    pub fn weighted_sums(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.neurons.iter().map(|n| n.weighted_sum(inputs)).collect()
    }

    /// Output value of every neuron.
    pub fn calculate_layer(&self, inputs: &[f64], activation: ActivationKind) -> Result<Vec<f64>> {
        self.neurons
            .iter()
            .map(|n| n.calculate_value(inputs, activation))
            .collect()
    }

    pub(crate) fn validate(&self, expected_inputs: usize) -> Result<()> {
        if self.neurons.is_empty() {
            return Err(NetError::InvalidNetwork("layer without neurons".into()));
        }
        if let Some(i) = self
            .neurons
            .iter()
            .position(|n| n.input_width() != expected_inputs)
        {
            return Err(NetError::InvalidNetwork(format!(
                "neuron {i} has {} weights, expected {expected_inputs}",
                self.neurons[i].input_width()
            )));
        }
        if let Some(i) = self
            .neurons
            .iter()
            .position(|n| !n.bias.is_finite() || n.weights.iter().any(|w| !w.is_finite()))
        {
            return Err(NetError::InvalidNetwork(format!(
                "neuron {i} has a non-finite weight or bias"
            )));
        }
        Ok(())
    }
}
