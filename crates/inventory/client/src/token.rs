use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use anyhow::{anyhow, Result};
use tracing::{debug, instrument, Level};

/// Shared holder of the bearer token, optionally persisted to a file.
#[derive(Clone, Debug, Default)]
pub struct TokenStore {
    path: Option<Arc<PathBuf>>,
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    /// A store that forgets the token when the process exits.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Opens a file-backed store, loading any token saved by a previous run.
    #[instrument(level = Level::INFO)]
    pub fn open(path: PathBuf) -> Result<Self> {
        let token = match fs::read_to_string(&path) {
            Ok(token) => Some(token.trim().to_string()).filter(|token| !token.is_empty()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                return Err(anyhow!(
                    "failed to read the token file ({}): {error}",
                    path.display(),
                ))
            }
        };

        Ok(Self {
            path: Some(Arc::new(path)),
            token: Arc::new(RwLock::new(token)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        ::dirs::config_dir()
            .map(|dir| dir.join("inventory").join("token"))
            .ok_or_else(|| anyhow!("failed to find the user config directory"))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref().map(PathBuf::as_path)
    }

    pub fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_present(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn set(&self, token: String) -> Result<()> {
        if let Some(path) = self.path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|error| {
                    anyhow!(
                        "failed to create the token directory ({}): {error}",
                        parent.display(),
                    )
                })?;
            }
            write_private(path, &token).map_err(|error| {
                anyhow!("failed to write the token file ({}): {error}", path.display())
            })?;
            debug!("saved token to {}", path.display());
        }

        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match self.path() {
            Some(path) => match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(error) => Err(anyhow!(
                    "failed to remove the token file ({}): {error}",
                    path.display(),
                )),
            },
            None => Ok(()),
        }
    }
}

/// Writes the file readable by its owner only.
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // mode only applies to new files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}
