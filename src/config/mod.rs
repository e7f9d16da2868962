use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
mod types;

pub use types::*;

/// Environment variable that points at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "DOCQA_CONFIG";
/// Environment variable that overrides `server.port`.
pub const PORT_ENV: &str = "PORT";

/// Loads the user config and applies environment overrides.
pub fn load_user_config() -> Result<Config> {
    let config_file_path = match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => PathBuf::from(path),
        None => get_config_directory()?.join("config.toml"),
    };

    let mut config = load_config_from(&config_file_path)?;
    apply_port_override(&mut config, std::env::var(PORT_ENV).ok().as_deref())?;
    Ok(config)
}

/// Reads the config at `config_file_path`, writing a default one first if it is missing.
/// A file that fails to parse is moved aside to `.bak` and replaced with defaults.
pub fn load_config_from(config_file_path: &Path) -> Result<Config> {
    if let Some(config_dir) = config_file_path.parent() {
        fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
    }

    if !config_file_path.exists() {
        create_default_config(config_file_path)?;
    }

    let config_content = fs::read_to_string(config_file_path)
        .with_context(|| format!("Failed to read config file: {:?}", config_file_path))?;

    match toml::from_str::<Config>(&config_content) {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            let bak_path = config_file_path.with_extension("bak");
            fs::rename(config_file_path, &bak_path)
                .with_context(|| format!("Failed to backup old config to {:?}", bak_path))?;
            create_default_config(config_file_path)?;
            let config_content = fs::read_to_string(config_file_path).with_context(|| {
                format!("Failed to read new config file: {:?}", config_file_path)
            })?;
            let config: Config = toml::from_str(&config_content)
                .with_context(|| "Failed to parse new config file")?;
            eprintln!(
                "Config parse error: {}. Old config has been backed up to {:?}, new config created.",
                e, bak_path
            );
            Ok(config)
        }
    }
}

/// Applies a `PORT` value on top of the file config. An unparsable value is an error.
pub fn apply_port_override(config: &mut Config, port: Option<&str>) -> Result<()> {
    if let Some(raw) = port {
        let raw = raw.trim();
        if !raw.is_empty() {
            config.server.port = raw
                .parse()
                .with_context(|| format!("Invalid {} value: {:?}", PORT_ENV, raw))?;
        }
    }
    Ok(())
}

fn get_config_directory() -> Result<PathBuf> {
    if let Some(config_dir) = dirs::config_dir() {
        Ok(config_dir.join("docqa"))
    } else {
        anyhow::bail!("Could not determine config directory")
    }
}

fn create_default_config(config_path: &Path) -> Result<()> {
    let default_cfg = Config::default();
    let default_content = toml::to_string_pretty(&default_cfg)
        .map_err(|e| anyhow::anyhow!("Failed to serialize default config: {}", e))?;
    fs::write(config_path, default_content)
        .with_context(|| format!("Failed to write default config to {:?}", config_path))?;
    eprintln!("Created default config file at: {:?}", config_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_config_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.similarity.threshold, 0.7);
        assert_eq!(config.ask.fallback, FallbackMode::Reject);
        assert!(config.ask.relevance_filter);
        assert_eq!(config.ask.suggestion_count, 3);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "log_level = \"Debug\"\n[ask]\nfallback = \"suggest\"\n[embedding]\nprovider = \"hashed\"\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.ask.fallback, FallbackMode::Suggest);
        assert_eq!(config.embedding.provider, EmbeddingProvider::Hashed);
        assert_eq!(config.ask.greetings.len(), 7);
        assert_eq!(config.messages.no_data, "No Q&A data available.");
    }

    #[test]
    fn broken_file_is_backed_up_and_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server = 12").unwrap();

        let config = load_config_from(&path).unwrap();

        assert_eq!(config.server.port, 5000);
        assert!(path.with_extension("bak").exists());
        assert!(path.exists());
    }

    #[test]
    fn port_override_applies_and_rejects_garbage() {
        let mut config = Config::default();

        apply_port_override(&mut config, Some("8081")).unwrap();
        assert_eq!(config.server.port, 8081);

        apply_port_override(&mut config, None).unwrap();
        assert_eq!(config.server.port, 8081);

        assert!(apply_port_override(&mut config, Some("not-a-port")).is_err());
    }
}
