use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Storage key, used as the file name inside the config directory.
pub const TOKEN_KEY: &str = "gh_token";
const APP_DIR: &str = "release-stats";

/// Persists the optional GitHub access token between runs.
///
/// An empty or cleared token removes the stored file instead of writing an
/// empty value.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(Self::default_path()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<config_dir>/release-stats/gh_token`, or under the home directory.
    ///
    /// Fails when neither directory resolves; pass an explicit path instead.
    pub fn default_path() -> Result<PathBuf> {
        token_path_in(dirs::config_dir().or_else(dirs::home_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return self.clear();
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        restrict_permissions(&self.path)?;

        info!(path = %self.path.display(), "Stored access token");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Removed access token");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored token to remove");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn token_path_in(base: Option<PathBuf>) -> Result<PathBuf> {
    let base = base.ok_or_else(|| {
        std::io::Error::new(
            ErrorKind::NotFound,
            "no config or home directory for the token file",
        )
    })?;
    Ok(base.join(APP_DIR).join(TOKEN_KEY))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
