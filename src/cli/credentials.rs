use std::env;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const SERVER_URL_ENV: &str = "RECIPEBOX_SERVER_URL";
pub const TOKEN_ENV: &str = "RECIPEBOX_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub server_url: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CredentialsFile {
    pub default: Option<Credentials>,
}

pub fn credentials_path() -> anyhow::Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "recipebox")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory. Is $HOME set?"))?;
    Ok(dirs.config_dir().join("credentials.toml"))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Credentials from the environment, if configured there.
///
/// Setting only one of the two variables is an error rather than a silent
/// fall back to the credentials file.
pub fn env_credentials() -> anyhow::Result<Option<Credentials>> {
    match (non_empty_var(SERVER_URL_ENV), non_empty_var(TOKEN_ENV)) {
        (Some(server_url), Some(token)) => Ok(Some(Credentials {
            server_url,
            token,
            email: None,
        })),
        (None, None) => Ok(None),
        (Some(_), None) => anyhow::bail!("{SERVER_URL_ENV} is set but {TOKEN_ENV} is missing"),
        (None, Some(_)) => anyhow::bail!("{TOKEN_ENV} is set but {SERVER_URL_ENV} is missing"),
    }
}

pub fn load_credentials() -> anyhow::Result<Credentials> {
    if let Some(creds) = env_credentials()? {
        return Ok(creds);
    }

    let path = credentials_path()?;
    let content = fs::read_to_string(&path)
        .map_err(|_| anyhow::anyhow!("Not logged in. Run 'recipebox login' first."))?;
    let file: CredentialsFile = toml::from_str(&content)?;
    file.default.ok_or_else(|| {
        anyhow::anyhow!("Credentials file is corrupted. Run 'recipebox login' to fix.")
    })
}

pub fn save_credentials(creds: &Credentials) -> anyhow::Result<()> {
    let path = credentials_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = CredentialsFile {
        default: Some(creds.clone()),
    };
    let content = toml::to_string_pretty(&file)?;
    fs::write(&path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Removes the credentials file. Returns false if there was none.
pub fn delete_credentials() -> anyhow::Result<bool> {
    let path = credentials_path()?;
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path)?;
    Ok(true)
}
