use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".checkin-pipeline";
const CONFIG_FILE: &str = "config.env";

/// Loads process environment from `.env` in the working directory, then from
/// `~/.checkin-pipeline/config.env`. dotenv never overwrites variables that
/// are already set, so the local `.env` wins over the home-directory defaults
/// and real environment variables win over both.
pub fn load_env() {
    let _ = dotenv::dotenv();

    if let Some(path) = home_config_file() {
        let _ = dotenv::from_filename(path);
    }
}

pub fn load_env_from_paths(local_env: &Path, default_config: &Path) {
    let _ = dotenv::from_filename(local_env);
    let _ = dotenv::from_filename(default_config);
}

pub fn config_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(CONFIG_DIR),
        Err(_) => PathBuf::from(CONFIG_DIR),
    }
}

fn home_config_file() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn local_env_takes_priority_over_default_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let local_env_path = temp_dir.path().join(".env");
        let default_config_path = temp_dir.path().join("config.env");

        let mut local_env = std::fs::File::create(&local_env_path).unwrap();
        writeln!(local_env, "CHECKIN_ENV_PRIORITY_VAR=from_local_env").unwrap();

        let mut default_config = std::fs::File::create(&default_config_path).unwrap();
        writeln!(default_config, "CHECKIN_ENV_PRIORITY_VAR=from_default_config").unwrap();
        writeln!(default_config, "CHECKIN_ENV_DEFAULT_ONLY=default_value").unwrap();

        load_env_from_paths(&local_env_path, &default_config_path);

        assert_eq!(
            std::env::var("CHECKIN_ENV_PRIORITY_VAR").unwrap(),
            "from_local_env",
            "local .env should win over the home-directory defaults"
        );
        assert_eq!(
            std::env::var("CHECKIN_ENV_DEFAULT_ONLY").unwrap(),
            "default_value",
            "default-only var should still be loaded"
        );
    }

    #[test]
    fn config_dir_falls_back_without_home() {
        // config_dir never fails, with or without HOME set
        let dir = config_dir();
        assert!(dir.to_string_lossy().contains(CONFIG_DIR));
    }
}
