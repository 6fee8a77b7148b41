use crate::errors::AppError;
use crate::models::AppData;
use std::{path::Path, path::PathBuf, sync::Arc};
use tokio::{fs, sync::Mutex};
use tracing::error;

/// The in-memory dataset plus the file it is mirrored to.
///
/// Writes run as a transaction: the closure mutates a copy, the copy is
/// persisted, and only then does it replace the live data. A failed closure or
/// a failed write leaves the live data untouched. The lock is held for the whole
/// transaction, so find-or-create sequences cannot interleave.
#[derive(Clone)]
pub struct Store {
    path: PathBuf,
    data: Arc<Mutex<AppData>>,
}

impl Store {
    pub fn new(path: PathBuf, data: AppData) -> Self {
        Self {
            path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn read<T>(
        &self,
        f: impl FnOnce(&AppData) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let data = self.data.lock().await;
        f(&data)
    }

    pub async fn write<T>(
        &self,
        f: impl FnOnce(&mut AppData) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut data = self.data.lock().await;
        let mut draft = data.clone();
        let out = f(&mut draft)?;
        persist_data(&self.path, &draft).await?;
        *data = draft;
        Ok(out)
    }
}

/// Loads the dataset. A missing file is an empty dataset; an unreadable or
/// unparsable one is an error, so it is never overwritten with empty data.
pub async fn load_data(path: &Path) -> Result<AppData, AppError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(AppData::default()),
        Err(err) => {
            error!(path = %path.display(), "failed to read data file: {err}");
            return Err(AppError::internal(err));
        }
    };
    serde_json::from_slice(&bytes).map_err(|err| {
        error!(path = %path.display(), "failed to parse data file: {err}");
        AppError::internal(err)
    })
}

/// Writes to a sibling temp file and renames it over `path`, so readers only
/// ever see a complete document.
pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let staging = path.with_extension("json.tmp");
    let written = match fs::write(&staging, payload).await {
        Ok(()) => fs::rename(&staging, path).await,
        Err(err) => Err(err),
    };
    written.map_err(|err| {
        error!(path = %path.display(), "failed to write data file: {err}");
        AppError::internal(err)
    })
}
