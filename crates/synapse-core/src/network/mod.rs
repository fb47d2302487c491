pub mod activation;
pub mod gradient;
pub mod layer;
pub mod network;
pub mod neuron;

pub use activation::ActivationKind;
pub use gradient::{BackpropagationResult, LayerGradient, NetworkGradient};
pub use layer::Layer;
pub use network::{Evaluation, Network, TrainingStats};
pub use neuron::Neuron;
