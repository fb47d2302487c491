use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use synapse_accel::probe_acceleration;
use synapse_core::{save_network, Network};

use crate::TrainArgs;

pub fn run(args: TrainArgs) -> Result<()> {
    // training runs on the CPU either way; the probe result is informational
    let accel = probe_acceleration();
    if accel.is_available() {
        info!("cuBLAS handle created; training still runs on the CPU");
    } else {
        warn!("GPU matrix acceleration unavailable; training on the CPU");
    }

    let dir = super::resolve_data_dir(args.data_dir);
    let mut set = super::load_mnist(&dir)?;
    if let Some(n) = args.limit {
        set.train.truncate(n);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = Network::new(&args.layers, args.activation, &mut rng)
        .context("building network")?;
    info!(
        sizes = ?network.layer_sizes(),
        activation = %args.activation,
        train = set.train.len(),
        "network ready"
    );

    for epoch in 0..args.epochs {
        info!(epoch, "epoch start");
        if args.shuffle {
            set.train.shuffle(&mut rng);
        }
        let stats = network
            .train(&set.train, args.batch_size, args.learning_rate)
            .with_context(|| format!("training epoch {epoch}"))?;
        info!(
            epoch,
            batches = stats.batches,
            mean_error = stats.mean_error,
            "epoch done"
        );
    }

    super::report_accuracy(&network, &set.test)?;

    if let Some(out) = args.out {
        save_network(&network, &out)
            .with_context(|| format!("saving network to {}", out.display()))?;
        info!(path = %out.display(), "network saved");
    }
    Ok(())
}
