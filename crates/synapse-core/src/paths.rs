use dirs::data_dir;
use std::path::PathBuf;

pub const HOME_ENV: &str = "SYNAPSE_HOME";
pub const DATA_DIR_ENV: &str = "SYNAPSE_DATA_DIR";

pub fn synapse_home() -> PathBuf {
    if let Some(p) = env_path(HOME_ENV) {
        return p;
    }
    // Linux resolves to ~/.local/share/Synapse
    data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("Synapse")
}

pub fn datasets_dir() -> PathBuf {
    synapse_home().join("datasets")
}
pub fn mnist_dir() -> PathBuf {
    env_path(DATA_DIR_ENV).unwrap_or_else(|| datasets_dir().join("mnist"))
}

pub fn models_dir() -> PathBuf {
    synapse_home().join("models")
}
pub fn default_model_path() -> PathBuf {
    models_dir().join("network.json")
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(core_env)]
    fn home_override_moves_everything() {
        temp_env::with_vars(
            [(HOME_ENV, Some("/srv/synapse")), (DATA_DIR_ENV, None)],
            || {
                assert_eq!(synapse_home(), PathBuf::from("/srv/synapse"));
                assert_eq!(mnist_dir(), PathBuf::from("/srv/synapse/datasets/mnist"));
                assert_eq!(
                    default_model_path(),
                    PathBuf::from("/srv/synapse/models/network.json")
                );
            },
        );
    }

    #[test]
    #[serial(core_env)]
    fn data_dir_override_wins_for_mnist() {
        temp_env::with_vars(
            [(HOME_ENV, Some("/srv/synapse")), (DATA_DIR_ENV, Some("/data/mnist"))],
            || assert_eq!(mnist_dir(), PathBuf::from("/data/mnist")),
        );
    }
}
