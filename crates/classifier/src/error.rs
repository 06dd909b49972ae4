use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring the model into memory. Fatal at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("model file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("model file {} is unreadable: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("model file {} is not a compatible model: {reason}", path.display())]
    Incompatible { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::NotFound { path }
            | LoadError::Unreadable { path, .. }
            | LoadError::Incompatible { path, .. } => path,
        }
    }
}

/// Checks that `path` names a readable regular file.
pub(crate) fn check_model_file(path: &std::path::Path) -> Result<(), LoadError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            std::fs::File::open(path).map_err(|source| LoadError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(())
        }
        Ok(_) => Err(LoadError::Unreadable {
            path: path.to_path_buf(),
            source: io::Error::other("not a regular file"),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LoadError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}
