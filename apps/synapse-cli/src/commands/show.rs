use anyhow::{bail, Result};
use std::path::PathBuf;

use synapse_core::default_model_path;

pub fn run(index: usize, model: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<()> {
    let set = super::load_mnist(&super::resolve_data_dir(data_dir))?;
    let test = &set.test;
    let Some((_, label)) = test.get(index) else {
        bail!("index {index} out of range, test set has {} images", test.len());
    };

    print!("{}", test.render_ascii(index));
    println!("Expected: {label}");

    // an explicit --model must load; the default one is optional
    let network = match model {
        Some(path) => Some(super::load_model(&path)?),
        None => {
            let path = default_model_path();
            if path.exists() {
                Some(super::load_model(&path)?)
            } else {
                None
            }
        }
    };
    if let Some(network) = network {
        let outputs = network.output(&test.input(index))?;
        let guess = network.classify(&test.input(index))?;
        let listing: Vec<String> = outputs
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{i}-{v:.3}"))
            .collect();
        println!("Network output: {}", listing.join(", "));
        println!("Classified as: {guess}");
    }
    Ok(())
}
