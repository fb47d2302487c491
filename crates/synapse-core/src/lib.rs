//! synapse-core
//!
//! CPU side of Synapse:
//! - feed-forward network with pluggable activation, backprop and mini-batch SGD
//! - MNIST IDX reader and in-memory datasets
//! - JSON model storage under ~/.local/share/Synapse/models
//!
//! Whether cuBLAS is usable is answered by `synapse-accel`; nothing here
//! depends on it.

pub mod data;
pub mod errors;
pub mod network;
pub mod paths;
pub mod storage;

pub use data::{Dataset, MnistSet};
pub use errors::{NetError, Result};
pub use network::{
    ActivationKind, BackpropagationResult, Evaluation, Layer, LayerGradient, Network,
    NetworkGradient, Neuron, TrainingStats,
};
pub use paths::{default_model_path, mnist_dir, models_dir, synapse_home};
pub use storage::{load_network, save_network};
