use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::activation::ActivationKind;
use super::gradient::{BackpropagationResult, LayerGradient, NetworkGradient};
use super::layer::Layer;
use crate::data::Dataset;
use crate::errors::{NetError, Result};

/// Fully-connected feed-forward network. Layers run input side first; the
/// same activation is applied at every layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub input_size: usize,
    pub activation: ActivationKind,
    pub layers: Vec<Layer>,
}

/// Values seen during one forward pass.
struct ForwardPass {
    // activations[0] is the input; activations[l + 1] is the output of layer l
    activations: Vec<Vec<f64>>,
    // weighted[l] is layer l before activation
    weighted: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub batches: usize,
    pub samples: usize,
    /// Mean squared error per sample over everything seen.
    pub mean_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }
}

impl Network {
    /// `layer_sizes[0]` is the input width; every following entry is one
    /// layer. Needs at least one layer and no zero-sized entries.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activation: ActivationKind,
        rng: &mut R,
    ) -> Result<Self> {
        let mut net = Self::zeroed(layer_sizes, activation)?;
        for layer in &mut net.layers {
            for neuron in &mut layer.neurons {
                neuron.randomize(rng);
            }
        }
        Ok(net)
    }

    /// Same topology rules as `new`, all weights and biases zero.
    pub fn zeroed(layer_sizes: &[usize], activation: ActivationKind) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(NetError::InvalidTopology(format!(
                "need an input size and at least one layer, got {} sizes",
                layer_sizes.len()
            )));
        }
        if let Some(i) = layer_sizes.iter().position(|&s| s == 0) {
            return Err(NetError::InvalidTopology(format!("size at index {i} is zero")));
        }

        let layers = layer_sizes
            .windows(2)
            .map(|w| Layer::zeroed(w[1], w[0]))
            .collect();

        Ok(Self {
            input_size: layer_sizes[0],
            activation,
            layers,
        })
    }

    /// Input width followed by every layer's size.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_size)
            .chain(self.layers.iter().map(Layer::len))
            .collect()
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(Layer::len).unwrap_or(0)
    }

    /// Checks that the layers chain: each layer's weight width equals the
    /// previous layer's size.
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(NetError::InvalidNetwork("input size is zero".into()));
        }
        if self.layers.is_empty() {
            return Err(NetError::InvalidNetwork("no layers".into()));
        }
        let mut width = self.input_size;
        for (l, layer) in self.layers.iter().enumerate() {
            layer
                .validate(width)
                .map_err(|e| NetError::InvalidNetwork(format!("layer {l}: {e}")))?;
            width = layer.len();
        }
        Ok(())
    }

    pub fn output(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.check_input(inputs)?;
        let mut values = inputs.to_vec();
        for layer in &self.layers {
            values = layer.calculate_layer(&values, self.activation)?;
        }
        Ok(values)
    }

    /// The input followed by the output of every layer.
    pub fn all_values(&self, inputs: &[f64]) -> Result<Vec<Vec<f64>>> {
        Ok(self.forward(inputs)?.activations)
    }

    /// Index of the largest output.
    pub fn classify(&self, inputs: &[f64]) -> Result<usize> {
        Ok(argmax(&self.output(inputs)?))
    }

    fn check_input(&self, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.input_size {
            return Err(NetError::LengthMismatch {
                expected: self.input_size,
                actual: inputs.len(),
            });
        }
        Ok(())
    }

    fn forward(&self, inputs: &[f64]) -> Result<ForwardPass> {
        self.check_input(inputs)?;
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut weighted = Vec::with_capacity(self.layers.len());
        activations.push(inputs.to_vec());

        for layer in &self.layers {
            let prev = activations.last().map(Vec::as_slice).unwrap_or(inputs);
            let z = layer.weighted_sums(prev)?;
            let a: Vec<f64> = z.iter().map(|&x| self.activation.value_at(x)).collect();
            weighted.push(z);
            activations.push(a);
        }
        Ok(ForwardPass {
            activations,
            weighted,
        })
    }

    /// Gradient of the squared-error cost `Σ (output - desired)^2` for one
    /// example.
    pub fn backpropagate(&self, inputs: &[f64], desired: &[f64]) -> Result<BackpropagationResult> {
        if desired.len() != self.output_size() {
            return Err(NetError::LengthMismatch {
                expected: self.output_size(),
                actual: desired.len(),
            });
        }
        let pass = self.forward(inputs)?;
        let n_layers = self.layers.len();

        let output = &pass.activations[n_layers];
        let z_out = &pass.weighted[n_layers - 1];
        let mut error = 0.0;
        let mut deltas: Vec<f64> = output
            .iter()
            .zip(desired)
            .zip(z_out)
            .map(|((a, y), z)| {
                let diff = a - y;
                error += diff * diff;
                2.0 * diff * self.activation.derivative_at(*z)
            })
            .collect();

        let mut grads: Vec<LayerGradient> = Vec::with_capacity(n_layers);
        for l in (0..n_layers).rev() {
            let prev = &pass.activations[l];
            let mut g = LayerGradient::zeros(deltas.len(), prev.len());
            for (j, d) in deltas.iter().enumerate() {
                g.bias[j] = *d;
                let row = &mut g.weights[j * prev.len()..(j + 1) * prev.len()];
                for (w, x) in row.iter_mut().zip(prev) {
                    *w = d * x;
                }
            }
            grads.push(g);

            if l > 0 {
                let layer = &self.layers[l];
                deltas = pass.weighted[l - 1]
                    .iter()
                    .enumerate()
                    .map(|(k, z)| {
                        let back: f64 = layer
                            .neurons
                            .iter()
                            .zip(&deltas)
                            .map(|(n, d)| d * n.weights[k])
                            .sum();
                        back * self.activation.derivative_at(*z)
                    })
                    .collect();
            }
        }
        grads.reverse();

        Ok(BackpropagationResult {
            gradient: NetworkGradient::new(grads),
            error,
        })
    }

    /// `param -= learning_rate * gradient` for every weight and bias.
    pub fn apply_gradient(&mut self, gradient: &NetworkGradient, learning_rate: f64) -> Result<()> {
        if gradient.layers.len() != self.layers.len() {
            return Err(NetError::LengthMismatch {
                expected: self.layers.len(),
                actual: gradient.layers.len(),
            });
        }
        for (layer, g) in self.layers.iter_mut().zip(&gradient.layers) {
            if g.neurons() != layer.len() || g.inputs != layer.input_width() {
                return Err(NetError::LengthMismatch {
                    expected: layer.len() * layer.input_width(),
                    actual: g.weights.len(),
                });
            }
            for (j, neuron) in layer.neurons.iter_mut().enumerate() {
                neuron.bias -= learning_rate * g.bias[j];
                for (w, dw) in neuron.weights.iter_mut().zip(g.weight_row(j)) {
                    *w -= learning_rate * dw;
                }
            }
        }
        Ok(())
    }

    /// One pass of mini-batch gradient descent over `data`, in order.
    /// Per-example gradients are summed over each batch, then applied once.
    /// A trailing partial batch is skipped.
    pub fn train(
        &mut self,
        data: &Dataset,
        batch_size: usize,
        learning_rate: f64,
    ) -> Result<TrainingStats> {
        if batch_size == 0 {
            return Err(NetError::InvalidArgument("batch size must be > 0".into()));
        }
        if data.image_size() != self.input_size {
            return Err(NetError::LengthMismatch {
                expected: self.input_size,
                actual: data.image_size(),
            });
        }

        let batches = data.len() / batch_size;
        let mut total_error = 0.0;
        for batch in 0..batches {
            let start = batch * batch_size;
            let mut sum: Option<NetworkGradient> = None;
            let mut batch_error = 0.0;
            for i in start..start + batch_size {
                let result = self.backpropagate(&data.input(i), &data.one_hot(i))?;
                batch_error += result.error;
                match sum.as_mut() {
                    Some(s) => s.accumulate(&result.gradient)?,
                    None => sum = Some(result.gradient),
                }
            }
            if let Some(s) = sum {
                self.apply_gradient(&s, learning_rate)?;
            }
            total_error += batch_error;
            debug!(
                batch,
                error = batch_error / batch_size as f64,
                "batch applied"
            );
        }

        let samples = batches * batch_size;
        let stats = TrainingStats {
            batches,
            samples,
            mean_error: if samples == 0 {
                0.0
            } else {
                total_error / samples as f64
            },
        };
        info!(
            batches = stats.batches,
            samples = stats.samples,
            mean_error = stats.mean_error,
            "training pass done"
        );
        Ok(stats)
    }

    /// Share of examples whose largest output matches the label.
    pub fn evaluate(&self, data: &Dataset) -> Result<Evaluation> {
        let mut correct = 0;
        for i in 0..data.len() {
            if self.classify(&data.input(i))? == data.label(i) as usize {
                correct += 1;
            }
        }
        Ok(Evaluation {
            correct,
            total: data.len(),
        })
    }
}

/// First index of the maximum; 0 for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
