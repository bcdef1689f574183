use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use survey_auth::session::{Role, Session};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 2;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    /// Added in v1.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Signed-in user. Added in v2; v1 kept a bare token with no identity.
    #[serde(default)]
    pub session: Option<StoredSession>,
    pub created_at: jiff::Timestamp,
}

/// Identity remembered from the last sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: String,
    pub role: Role,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
}

impl StoredSession {
    pub fn to_session(&self) -> Session {
        let session = Session::new(self.user_id.clone(), self.role, self.token.clone());
        match &self.email {
            Some(email) => session.with_email(email.clone()),
            None => session,
        }
    }
}

/// Redacted config info safe to print or log.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub created_at: String,
    pub user_id: Option<String>,
    pub role: Option<Role>,
    pub token_hint: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl DeskConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: api_base_url.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            session: None,
            created_at: jiff::Timestamp::now(),
        }
    }

    /// Apply `SURVEY_API_URL` and `SURVEY_TOKEN` from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("SURVEY_API_URL").ok(),
            std::env::var("SURVEY_TOKEN").ok(),
        );
    }

    fn apply_overrides(&mut self, api_url: Option<String>, token: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty())
            && let Some(session) = self.session.as_mut()
        {
            session.token = token;
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("edu.survey.desk"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn has_config() -> bool {
    config_path().map(|p| p.exists()).unwrap_or(false)
}

pub fn load_config() -> eyre::Result<DeskConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> eyre::Result<DeskConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: DeskConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update survey-desk."
        ));
    }

    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

    // v0 → v1: request timeout
    if from_version < 1 {
        obj.entry("request_timeout_secs")
            .or_insert(serde_json::Value::Number(DEFAULT_TIMEOUT_SECS.into()));
        tracing::info!("migrated config v0 → v1 (added request_timeout_secs)");
    }

    // v1 → v2: the bare token has no identity attached and cannot be turned
    // into a session, so it is dropped and the user signs in again.
    if from_version < 2 {
        if obj.remove("token").is_some() {
            tracing::info!("dropped pre-v2 token; sign in again");
        }
        obj.entry("session").or_insert(serde_json::Value::Null);
        tracing::info!("migrated config v1 → v2 (added session)");
    }

    obj.insert(
        "config_version".to_string(),
        serde_json::Value::Number(CURRENT_VERSION.into()),
    );

    Ok(json)
}

pub fn save_config(config: &DeskConfig) -> eyre::Result<PathBuf> {
    save_config_in(&config_dir()?, config)
}

pub fn save_config_in(dir: &Path, config: &DeskConfig) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The file holds a bearer token
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}

pub fn delete_config() -> eyre::Result<()> {
    let path = config_path()?;
    if path.exists() {
        std::fs::remove_file(&path)?;
        tracing::info!(path = %path.display(), "config deleted");
    }
    Ok(())
}

pub fn config_info(config: &DeskConfig) -> ConfigInfo {
    let (user_id, role, token_hint) = match &config.session {
        Some(session) => (
            Some(session.user_id.clone()),
            Some(session.role),
            Some(redact_token(&session.token)),
        ),
        None => (None, None, None),
    };

    ConfigInfo {
        api_base_url: config.api_base_url.clone(),
        request_timeout_secs: config.request_timeout_secs,
        created_at: config.created_at.to_string(),
        user_id,
        role,
        token_hint,
    }
}

fn redact_token(token: &str) -> String {
    if token.len() <= 8 {
        return "****".to_string();
    }
    match (token.get(..4), token.get(token.len() - 4..)) {
        (Some(prefix), Some(suffix)) => format!("{prefix}...{suffix}"),
        _ => "****".to_string(),
    }
}
