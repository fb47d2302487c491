pub mod dataset;
pub mod idx;

pub use dataset::{Dataset, CLASSES};

use std::path::Path;
use tracing::info;

use crate::errors::Result;

pub const TRAIN_IMAGES: &str = "train-images.idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels.idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images.idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels.idx1-ubyte";

/// The four MNIST files, loaded.
#[derive(Debug, Clone)]
pub struct MnistSet {
    pub train: Dataset,
    pub test: Dataset,
}

impl MnistSet {
    /// Reads the standard file names from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let train = load_pair(dir, TRAIN_IMAGES, TRAIN_LABELS)?;
        let test = load_pair(dir, TEST_IMAGES, TEST_LABELS)?;
        info!(
            dir = %dir.display(),
            train = train.len(),
            test = test.len(),
            "MNIST loaded"
        );
        Ok(Self { train, test })
    }
}

pub fn load_pair(dir: &Path, images: &str, labels: &str) -> Result<Dataset> {
    let imgs = idx::read_images(&dir.join(images))?;
    let lbls = idx::read_labels(&dir.join(labels))?;
    Dataset::new(imgs, lbls)
}
