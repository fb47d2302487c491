use anyhow::Result;
use std::path::PathBuf;

use synapse_core::default_model_path;

pub fn run(model: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<()> {
    let model = model.unwrap_or_else(default_model_path);
    let network = super::load_model(&model)?;
    let set = super::load_mnist(&super::resolve_data_dir(data_dir))?;
    super::report_accuracy(&network, &set.test)
}
