pub mod evaluate;
pub mod probe;
pub mod show;
pub mod train;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use synapse_core::{load_network, mnist_dir, Dataset, MnistSet, Network};

pub(crate) fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(mnist_dir)
}

pub(crate) fn load_mnist(dir: &Path) -> Result<MnistSet> {
    MnistSet::load(dir).with_context(|| format!("loading MNIST from {}", dir.display()))
}

pub(crate) fn load_model(path: &Path) -> Result<Network> {
    load_network(path).with_context(|| format!("loading network {}", path.display()))
}

/// Evaluate and print the headline number.
pub(crate) fn report_accuracy(network: &Network, test: &Dataset) -> Result<()> {
    let eval = network.evaluate(test).context("evaluating on test set")?;
    println!(
        "Percent correct: {:.2} ({}/{})",
        eval.percent(),
        eval.correct,
        eval.total
    );
    Ok(())
}
