use rand::Rng;
use serde::{Deserialize, Serialize};

use super::activation::ActivationKind;
use crate::errors::{NetError, Result};

/// One unit of a layer: a weight per input plus a bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl Neuron {
    /// Zero weights and bias.
    pub fn new(n_inputs: usize) -> Self {
        Self {
            weights: vec![0.0; n_inputs],
            bias: 0.0,
        }
    }

    #[inline]
    pub fn input_width(&self) -> usize {
        self.weights.len()
    }

    /// bias + Σ weight_i * input_i
    pub fn weighted_sum(&self, inputs: &[f64]) -> Result<f64> {
        if inputs.len() != self.weights.len() {
            return Err(NetError::LengthMismatch {
                expected: self.weights.len(),
                actual: inputs.len(),
            });
        }
        Ok(self.bias
            + self
                .weights
                .iter()
                .zip(inputs)
                .map(|(w, x)| w * x)
                .sum::<f64>())
    }

    pub fn calculate_value(&self, inputs: &[f64], activation: ActivationKind) -> Result<f64> {
        Ok(activation.value_at(self.weighted_sum(inputs)?))
    }

    /// Replace the weights; the count must not change.
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        if weights.len() != self.weights.len() {
            return Err(NetError::LengthMismatch {
                expected: self.weights.len(),
                actual: weights.len(),
            });
        }
        self.weights = weights;
        Ok(())
    }

    /// Uniform weights and bias in [-0.5, 0.5).
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for w in &mut self.weights {
            *w = rng.gen::<f64>() - 0.5;
        }
        self.bias = rng.gen::<f64>() - 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn constructing_sets_weight_count() {
        let n = Neuron::new(2);
        assert_eq!(n.weights.len(), 2);
        assert_eq!(n.bias, 0.0);
    }

    #[test]
    fn value_is_activation_of_weighted_sum() {
        let mut n = Neuron::new(3);
        n.set_weights(vec![0.5, -1.0, 2.0]).unwrap();
        n.bias = 0.25;
        let inputs = [2.0, 1.0, 0.5];
        // 0.25 + 1.0 - 1.0 + 1.0
        assert!((n.weighted_sum(&inputs).unwrap() - 1.25).abs() < 1e-12);
        assert!((n.calculate_value(&inputs, ActivationKind::Relu).unwrap() - 1.25).abs() < 1e-12);

        n.bias = -5.0;
        assert_eq!(n.calculate_value(&inputs, ActivationKind::Relu).unwrap(), 0.0);
    }

    #[test]
    fn wrong_input_count_is_rejected() {
        let n = Neuron::new(1);
        assert!(matches!(
            n.calculate_value(&[], ActivationKind::Sigmoid),
            Err(NetError::LengthMismatch {
                expected: 1,
                actual: 0
            })
        ));
    }

    #[test]
    fn set_weights_keeps_size() {
        let mut n = Neuron::new(2);
        assert!(n.set_weights(vec![1.0, 2.0, 3.0]).is_err());
        assert_eq!(n.weights, vec![0.0, 0.0]);
    }

    #[test]
    fn randomize_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut n = Neuron::new(64);
        n.randomize(&mut rng);
        assert!(n.weights.iter().all(|w| (-0.5..0.5).contains(w)));
        assert!((-0.5..0.5).contains(&n.bias));
        assert!(n.weights.iter().any(|w| *w != 0.0));
    }
}
