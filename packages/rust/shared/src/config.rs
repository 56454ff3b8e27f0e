//! Application configuration for routemap.
//!
//! Config is looked up at `./routemap.toml`, then `~/.routemap/routemap.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, RouteMapError};
use crate::types::{ChangeFrequency, Priority, RouteClass};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "routemap.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".routemap";

// ---------------------------------------------------------------------------
// Config structs (matching routemap.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Public origin and content API.
    #[serde(default)]
    pub site: SiteConfig,

    /// Where and what to write.
    #[serde(default)]
    pub output: OutputConfig,

    /// Content sources.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Priority / change-frequency table per route class.
    #[serde(default)]
    pub policy: RoutePolicy,

    /// Named overrides selected with `--env` (e.g., `production`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute public origin, e.g. `https://example.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Absolute origin of the content API, e.g. `https://api.example.com/api`.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Collection path under the API base listing content items.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_base: default_api_base(),
            collection: default_collection(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5173".into()
}
fn default_api_base() -> String {
    "http://localhost:5012/api".into()
}
fn default_collection() -> String {
    "movies".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `sitemap.xml` and `robots.txt`.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Whether to write `robots.txt` next to the site map.
    #[serde(default = "default_true")]
    pub include_robots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            include_robots: true,
        }
    }
}

fn default_output_dir() -> String {
    "public".into()
}
fn default_true() -> bool {
    true
}

/// `[sources]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Fetch content identifiers from the API.
    #[serde(default = "default_true")]
    pub include_remote: bool,

    /// Scan the bundled fallback-content resource.
    #[serde(default = "default_true")]
    pub include_embedded: bool,

    /// Path of the bundled fallback-content resource.
    #[serde(default = "default_embedded_path")]
    pub embedded_path: String,

    /// Upper bound on the API request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            include_remote: true,
            include_embedded: true,
            embedded_path: default_embedded_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_embedded_path() -> String {
    "src/utils/staticMovies.js".into()
}
fn default_timeout_secs() -> u64 {
    10
}

/// One row of the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub priority: Priority,
    pub change_freq: ChangeFrequency,
}

impl PolicyRule {
    const fn new(tenths: u8, change_freq: ChangeFrequency) -> Self {
        Self {
            priority: Priority::from_tenths(tenths),
            change_freq,
        }
    }
}

/// `[policy]` section: one rule per [`RouteClass`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePolicy {
    #[serde(default = "default_home_rule")]
    pub home: PolicyRule,
    #[serde(default = "default_auth_rule")]
    pub auth: PolicyRule,
    #[serde(default = "default_user_features_rule")]
    pub user_features: PolicyRule,
    #[serde(default = "default_profile_rule")]
    pub profile: PolicyRule,
    #[serde(default = "default_account_rule")]
    pub account: PolicyRule,
    #[serde(default = "default_admin_rule")]
    pub admin: PolicyRule,
    #[serde(default = "default_legal_rule")]
    pub legal: PolicyRule,
    /// Also applied to every remote and embedded content route.
    #[serde(default = "default_content_rule")]
    pub content: PolicyRule,
}

impl RoutePolicy {
    /// Look up the rule for a route class.
    pub fn rule(&self, class: RouteClass) -> PolicyRule {
        match class {
            RouteClass::Home => self.home,
            RouteClass::Auth => self.auth,
            RouteClass::UserFeatures => self.user_features,
            RouteClass::Profile => self.profile,
            RouteClass::Account => self.account,
            RouteClass::Admin => self.admin,
            RouteClass::Legal => self.legal,
            RouteClass::Content => self.content,
        }
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            home: default_home_rule(),
            auth: default_auth_rule(),
            user_features: default_user_features_rule(),
            profile: default_profile_rule(),
            account: default_account_rule(),
            admin: default_admin_rule(),
            legal: default_legal_rule(),
            content: default_content_rule(),
        }
    }
}

fn default_home_rule() -> PolicyRule {
    PolicyRule::new(10, ChangeFrequency::Daily)
}
fn default_auth_rule() -> PolicyRule {
    PolicyRule::new(8, ChangeFrequency::Monthly)
}
fn default_user_features_rule() -> PolicyRule {
    PolicyRule::new(9, ChangeFrequency::Weekly)
}
fn default_profile_rule() -> PolicyRule {
    PolicyRule::new(7, ChangeFrequency::Monthly)
}
fn default_account_rule() -> PolicyRule {
    PolicyRule::new(6, ChangeFrequency::Monthly)
}
fn default_admin_rule() -> PolicyRule {
    PolicyRule::new(5, ChangeFrequency::Monthly)
}
fn default_legal_rule() -> PolicyRule {
    PolicyRule::new(4, ChangeFrequency::Yearly)
}
fn default_content_rule() -> PolicyRule {
    PolicyRule::new(9, ChangeFrequency::Weekly)
}

/// `[environments.<name>]` entry. Unset fields keep the base value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Generate config (runtime, merged from config + environment + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime generation configuration, validated and threaded through the pipeline.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Public origin without trailing slash.
    pub base_url: String,
    /// Content API origin without trailing slash.
    pub api_base: String,
    /// Collection path segment(s) under the API base, without surrounding slashes.
    pub collection: String,
    /// Output directory for both artifacts.
    pub output_dir: PathBuf,
    /// Bundled fallback-content resource.
    pub embedded_path: PathBuf,
    pub include_robots: bool,
    pub include_remote: bool,
    pub include_embedded: bool,
    /// Upper bound on the API request, in seconds.
    pub timeout_secs: u64,
    pub policy: RoutePolicy,
}

impl GenerateConfig {
    /// Merge the selected environment over the base config and validate the result.
    pub fn resolve(config: &AppConfig, environment: Option<&str>) -> Result<Self> {
        let env = match environment {
            Some(name) => Some(config.environments.get(name).ok_or_else(|| {
                let known: Vec<&str> = config.environments.keys().map(String::as_str).collect();
                RouteMapError::config(format!(
                    "unknown environment '{name}' (configured: {})",
                    if known.is_empty() {
                        "none".to_string()
                    } else {
                        known.join(", ")
                    }
                ))
            })?),
            None => None,
        };

        let base_url = env
            .and_then(|e| e.base_url.as_deref())
            .unwrap_or(&config.site.base_url);
        let api_base = env
            .and_then(|e| e.api_base.as_deref())
            .unwrap_or(&config.site.api_base);
        let output_dir = env
            .and_then(|e| e.output_dir.as_deref())
            .unwrap_or(&config.output.dir);

        let collection = config.site.collection.trim().trim_matches('/');
        if collection.is_empty() {
            return Err(RouteMapError::config("site.collection must not be empty"));
        }
        if config.sources.timeout_secs == 0 {
            return Err(RouteMapError::config("sources.timeout_secs must be at least 1"));
        }

        Ok(Self {
            base_url: normalize_origin("site.base_url", base_url)?,
            api_base: normalize_origin("site.api_base", api_base)?,
            collection: collection.to_string(),
            output_dir: PathBuf::from(output_dir),
            embedded_path: PathBuf::from(&config.sources.embedded_path),
            include_robots: config.output.include_robots,
            include_remote: config.sources.include_remote,
            include_embedded: config.sources.include_embedded,
            timeout_secs: config.sources.timeout_secs,
            policy: config.policy.clone(),
        })
    }

    /// Replace the public origin, validating it like the configured one.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self> {
        self.base_url = normalize_origin("--base-url", raw)?;
        Ok(self)
    }

    /// Replace the content API origin, validating it like the configured one.
    pub fn with_api_base(mut self, raw: &str) -> Result<Self> {
        self.api_base = normalize_origin("--api-base", raw)?;
        Ok(self)
    }
}

/// Require an absolute http(s) URL with a host; strip trailing slashes.
fn normalize_origin(field: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| {
        RouteMapError::config(format!("{field} '{trimmed}' is not a valid URL: {e}"))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(RouteMapError::config(format!(
            "{field} '{trimmed}' must use http or https"
        )));
    }
    if url.host_str().is_none() {
        return Err(RouteMapError::config(format!("{field} '{trimmed}' has no host")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(RouteMapError::config(format!(
            "{field} '{trimmed}' must not carry a query or fragment"
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the per-user config directory (`~/.routemap/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RouteMapError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the per-user config file (`~/.routemap/routemap.toml`).
pub fn home_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Find the config file: `<dir>/routemap.toml` first, then the per-user file.
pub fn discover_config_path(dir: &Path) -> Option<PathBuf> {
    let local = dir.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    home_config_path().ok().filter(|p| p.is_file())
}

/// Load the application config.
///
/// An explicit path must exist. Without one, the discovered file is used,
/// or defaults when there is none.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let cwd = std::env::current_dir().map_err(|e| RouteMapError::io(".", e))?;
    match discover_config_path(&cwd) {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("config file not found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RouteMapError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        RouteMapError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Render the default config as TOML.
pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&AppConfig::default()).map_err(|e| RouteMapError::config(e.to_string()))
}

/// Write a default config file to `path`. Refuses to overwrite unless `force`.
pub fn init_config(path: &Path, force: bool) -> Result<PathBuf> {
    if path.exists() && !force {
        return Err(RouteMapError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| RouteMapError::io(parent, e))?;
    }

    std::fs::write(path, default_config_toml()?).map_err(|e| RouteMapError::io(path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("routemap-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_config_serializes() {
        let toml_str = default_config_toml().expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("staticMovies.js"));
        assert!(toml_str.contains("change_freq = \"daily\""));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = default_config_toml().expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.site.collection, "movies");
        assert_eq!(parsed.sources.timeout_secs, 10);
        assert_eq!(parsed.policy, RoutePolicy::default());
    }

    #[test]
    fn partial_policy_keeps_defaults() {
        let toml_str = r#"
[policy.legal]
priority = 0.3
change_freq = "never"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.policy.legal.priority.to_string(), "0.3");
        assert_eq!(config.policy.legal.change_freq, ChangeFrequency::Never);
        assert_eq!(config.policy.home, default_home_rule());
    }

    #[test]
    fn out_of_range_priority_rejected() {
        let toml_str = "[policy.home]\npriority = 3.0\nchange_freq = \"daily\"\n";
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }

    #[test]
    fn resolve_defaults() {
        let resolved = GenerateConfig::resolve(&AppConfig::default(), None).expect("resolve");
        assert_eq!(resolved.base_url, "http://localhost:5173");
        assert_eq!(resolved.api_base, "http://localhost:5012/api");
        assert_eq!(resolved.output_dir, PathBuf::from("public"));
        assert!(resolved.include_robots);
    }

    #[test]
    fn resolve_environment_override() {
        let toml_str = r#"
[site]
base_url = "http://localhost:5173/"

[environments.production]
base_url = "https://example.com/"
api_base = "https://api.example.com/api"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");

        let dev = GenerateConfig::resolve(&config, None).expect("resolve dev");
        assert_eq!(dev.base_url, "http://localhost:5173");

        let prod = GenerateConfig::resolve(&config, Some("production")).expect("resolve prod");
        assert_eq!(prod.base_url, "https://example.com");
        assert_eq!(prod.api_base, "https://api.example.com/api");
        // Not overridden by the environment
        assert_eq!(prod.output_dir, PathBuf::from("public"));
    }

    #[test]
    fn resolve_unknown_environment_fails() {
        let err = GenerateConfig::resolve(&AppConfig::default(), Some("staging")).unwrap_err();
        assert!(err.to_string().contains("unknown environment 'staging'"));
    }

    #[test]
    fn resolve_rejects_bad_urls() {
        let mut config = AppConfig::default();
        config.site.base_url = "example.com".into();
        assert!(GenerateConfig::resolve(&config, None).is_err());

        let mut config = AppConfig::default();
        config.site.api_base = "ftp://files.example.com".into();
        let err = GenerateConfig::resolve(&config, None).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn overrides_win_over_environment() {
        let toml_str = r#"
[environments.production]
base_url = "https://example.com"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        let resolved = GenerateConfig::resolve(&config, Some("production"))
            .and_then(|c| c.with_base_url("https://preview.example.com/"))
            .expect("override");
        assert_eq!(resolved.base_url, "https://preview.example.com");

        let err = GenerateConfig::resolve(&config, None)
            .and_then(|c| c.with_api_base("not a url"))
            .unwrap_err();
        assert!(err.to_string().contains("--api-base"));
    }

    #[test]
    fn init_config_refuses_overwrite() {
        let dir = temp_dir();
        let path = dir.join(CONFIG_FILE_NAME);

        init_config(&path, false).expect("first init");
        assert!(init_config(&path, false).is_err());
        assert!(init_config(&path, true).is_ok());

        let loaded = load_config_from(&path).expect("load written config");
        assert_eq!(loaded.output.dir, "public");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discover_prefers_local_file() {
        let dir = temp_dir();
        std::fs::write(dir.join(CONFIG_FILE_NAME), "[output]\ndir = \"dist\"\n").unwrap();

        let found = discover_config_path(&dir).expect("local config found");
        assert_eq!(found, dir.join(CONFIG_FILE_NAME));
        assert_eq!(load_config(Some(&found)).unwrap().output.dir, "dist");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
