//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::mime::MimeDetection;

/// Default listening port.
const DEFAULT_PORT: u16 = 3000;

/// Default scratch directory for uploads in flight.
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default maximum accepted upload size: 10 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Top-level configuration, built once at startup and shared read-only.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Provider selection and outbound call settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Upload intake settings.
    #[serde(default)]
    pub upload: UploadConfig,

    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,
}

/// HTTP server settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening port.
    pub port: u16,
    /// Scratch directory for transient upload storage.
    pub upload_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR) }
    }
}

/// Provider selection and outbound call settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name: `"openai"` or `"fal"`.
    pub name: String,
    /// Outbound call timeout in seconds. Absent means the provider's own
    /// default applies (120 s for `openai`, unbounded for `fal`).
    pub request_timeout_secs: Option<u64>,
    /// Cap on the encoded outbound payload size. Absent means no cap,
    /// the deliberate default since encoded images can be large.
    pub max_upstream_body_bytes: Option<u64>,
    /// Override for the `OpenAI` image-edit endpoint URL.
    pub openai_api_url: Option<String>,
    /// Override for the Fal.ai endpoint URL.
    pub fal_api_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "openai".to_string(),
            request_timeout_secs: None,
            max_upstream_body_bytes: None,
            openai_api_url: None,
            fal_api_url: None,
        }
    }
}

/// Upload intake settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum accepted upload size in bytes.
    pub max_bytes: u64,
    /// Explicit MIME allowlist. Absent means the provider's default applies
    /// (JPEG/PNG for `fal`, unrestricted for `openai`).
    pub allowed_types: Option<Vec<String>>,
    /// How the data-URL MIME type is determined for the base64 payload.
    pub mime_detection: MimeDetection,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: None,
            mime_detection: MimeDetection::Extension,
        }
    }
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// `OpenAI` API key.
    pub openai: Option<String>,
    /// Fal.ai API key.
    pub fal: Option<String>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the configured provider name, preferring the `PROVIDER` environment variable.
    #[must_use]
    pub fn provider_name(&self) -> String {
        std::env::var("PROVIDER").ok().unwrap_or_else(|| self.provider.name.clone())
    }

    /// Get the listening port, preferring the `PORT` environment variable.
    #[must_use]
    pub fn port(&self) -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(self.server.port)
    }

    /// Get the scratch directory, preferring the `UPLOAD_DIR` environment variable.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        std::env::var("UPLOAD_DIR")
            .ok()
            .map_or_else(|| self.server.upload_dir.clone(), PathBuf::from)
    }

    /// Get the `OpenAI` API key, preferring the environment variable.
    #[must_use]
    pub fn openai_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY").ok().or_else(|| self.keys.openai.clone())
    }

    /// Get the Fal.ai API key, preferring the environment variable.
    #[must_use]
    pub fn fal_key(&self) -> Option<String> {
        std::env::var("FAL_KEY").ok().or_else(|| self.keys.fal.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `FITGEN_CONFIG` environment variable
/// 3. `fitgen.toml` in the working directory
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("FITGEN_CONFIG") {
        return PathBuf::from(p);
    }

    PathBuf::from("fitgen.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.provider.name, "openai");
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
        assert!(config.upload.allowed_types.is_none());
        assert_eq!(config.upload.mime_detection, MimeDetection::Extension);
        assert!(config.keys.openai.is_none());
        assert!(config.keys.fal.is_none());
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/fitgen.toml")).unwrap();
        assert_eq!(config.provider.name, "openai");
    }

    #[test]
    fn load_valid_toml() {
        let dir = std::env::temp_dir().join("fitgen_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fitgen.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080
upload_dir = "/tmp/scratch"

[provider]
name = "fal"
request_timeout_secs = 30
max_upstream_body_bytes = 20000000

[upload]
max_bytes = 5000000
allowed_types = ["image/png"]
mime_detection = "declared"

[keys]
openai = "test-openai-key"
fal = "test-fal-key"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.upload_dir, PathBuf::from("/tmp/scratch"));
        assert_eq!(config.provider.name, "fal");
        assert_eq!(config.provider.request_timeout_secs, Some(30));
        assert_eq!(config.provider.max_upstream_body_bytes, Some(20_000_000));
        assert_eq!(config.upload.max_bytes, 5_000_000);
        assert_eq!(config.upload.allowed_types.as_deref(), Some(&["image/png".to_string()][..]));
        assert_eq!(config.upload.mime_detection, MimeDetection::Declared);
        assert_eq!(config.keys.openai.as_deref(), Some("test-openai-key"));
        assert_eq!(config.keys.fal.as_deref(), Some("test-fal-key"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_partial_toml_keeps_defaults() {
        let dir = std::env::temp_dir().join("fitgen_config_partial_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fitgen.toml");
        std::fs::write(&path, "[provider]\nname = \"fal\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.provider.name, "fal");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("fitgen_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(Config::load(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn openai_key_falls_back_to_file() {
        let config = Config {
            keys: KeysConfig { openai: Some("from-file".into()), fal: None },
            ..Config::default()
        };

        // Without env var, returns file value
        std::env::remove_var("OPENAI_API_KEY");
        assert_eq!(config.openai_key().as_deref(), Some("from-file"));
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
