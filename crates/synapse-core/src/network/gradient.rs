use serde::{Deserialize, Serialize};

use crate::errors::{NetError, Result};

/// Cost gradient for one layer. `weights` is row-major `[neuron][input]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerGradient {
    pub bias: Vec<f64>,
    pub weights: Vec<f64>,
    pub inputs: usize,
}

impl LayerGradient {
    pub fn zeros(neurons: usize, inputs: usize) -> Self {
        Self {
            bias: vec![0.0; neurons],
            weights: vec![0.0; neurons * inputs],
            inputs,
        }
    }

    #[inline]
    pub fn neurons(&self) -> usize {
        self.bias.len()
    }

    #[inline]
    pub fn weight(&self, neuron: usize, input: usize) -> f64 {
        self.weights[neuron * self.inputs + input]
    }

    /// Row of weight gradients for one neuron.
    pub fn weight_row(&self, neuron: usize) -> &[f64] {
        let start = neuron * self.inputs;
        &self.weights[start..start + self.inputs]
    }

    fn accumulate(&mut self, other: &LayerGradient) -> Result<()> {
        if self.neurons() != other.neurons() || self.inputs != other.inputs {
            return Err(NetError::LengthMismatch {
                expected: self.weights.len(),
                actual: other.weights.len(),
            });
        }
        for (a, b) in self.bias.iter_mut().zip(&other.bias) {
            *a += b;
        }
        for (a, b) in self.weights.iter_mut().zip(&other.weights) {
            *a += b;
        }
        Ok(())
    }
}

/// Gradient for every layer, input side first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkGradient {
    pub layers: Vec<LayerGradient>,
}

impl NetworkGradient {
    pub fn new(layers: Vec<LayerGradient>) -> Self {
        Self { layers }
    }

    /// Element-wise `self += other`. Shapes must match.
    pub fn accumulate(&mut self, other: &NetworkGradient) -> Result<()> {
        if self.layers.len() != other.layers.len() {
            return Err(NetError::LengthMismatch {
                expected: self.layers.len(),
                actual: other.layers.len(),
            });
        }
        for (a, b) in self.layers.iter_mut().zip(&other.layers) {
            a.accumulate(b)?;
        }
        Ok(())
    }

    /// Sum of several gradients of identical shape.
    pub fn sum<'a, I>(gradients: I) -> Result<Option<NetworkGradient>>
    where
        I: IntoIterator<Item = &'a NetworkGradient>,
    {
        let mut iter = gradients.into_iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };
        let mut total = first.clone();
        for g in iter {
            total.accumulate(g)?;
        }
        Ok(Some(total))
    }
}

/// Gradient of one training example plus its squared error.
#[derive(Debug, Clone)]
pub struct BackpropagationResult {
    pub gradient: NetworkGradient,
    pub error: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(value: f64) -> NetworkGradient {
        let mut a = LayerGradient::zeros(2, 3);
        a.bias.iter_mut().for_each(|b| *b = value);
        a.weights.iter_mut().for_each(|w| *w = value);
        NetworkGradient::new(vec![a, LayerGradient::zeros(1, 2)])
    }

    #[test]
    fn sum_adds_elementwise() {
        let gs = [filled(1.0), filled(2.5), filled(-0.5)];
        let total = NetworkGradient::sum(&gs).unwrap().unwrap();
        assert_eq!(total.layers[0].bias, vec![3.0, 3.0]);
        assert_eq!(total.layers[0].weight(1, 2), 3.0);
        assert_eq!(total.layers[1].weights, vec![0.0, 0.0]);
    }

    #[test]
    fn sum_of_nothing_is_none() {
        let empty: Vec<NetworkGradient> = Vec::new();
        assert!(NetworkGradient::sum(&empty).unwrap().is_none());
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let mut a = filled(1.0);
        let b = NetworkGradient::new(vec![LayerGradient::zeros(2, 4), LayerGradient::zeros(1, 2)]);
        assert!(a.accumulate(&b).is_err());
        let c = NetworkGradient::new(vec![LayerGradient::zeros(2, 3)]);
        assert!(a.accumulate(&c).is_err());
    }

    #[test]
    fn rows_are_row_major() {
        let mut g = LayerGradient::zeros(2, 3);
        g.weights = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(g.weight_row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(g.weight(0, 2), 3.0);
    }
}
