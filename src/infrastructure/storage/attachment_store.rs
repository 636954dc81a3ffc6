use crate::application::ports::attachments::{AttachmentStore, DraftFolder};
use crate::domain::value_objects::FileRef;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem-backed staging area for offline attachments, rooted at the
/// configured data directory. Folder layout follows
/// [`DraftFolder::relative_path`].
pub struct FsAttachmentStore {
    root: PathBuf,
}

impl FsAttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn folder_path(&self, folder: &DraftFolder) -> PathBuf {
        self.root.join(folder.relative_path())
    }

    fn storage_err(path: &Path, err: std::io::Error) -> AppError {
        AppError::Storage(format!("{}: {}", path.display(), err))
    }
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn store_file(
        &self,
        folder: &DraftFolder,
        filename: &str,
        data: &[u8],
    ) -> Result<(), AppError> {
        // Staged filenames come from user file pickers; strip any path
        // component so they cannot escape the folder.
        let filename = Path::new(filename)
            .file_name()
            .ok_or_else(|| AppError::InvalidInput(format!("invalid filename: {filename}")))?;

        let dir = self.folder_path(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Self::storage_err(&dir, e))?;

        let path = dir.join(filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Self::storage_err(&path, e))?;

        debug!("Staged attachment at {}", path.display());
        Ok(())
    }

    async fn list_folder(&self, folder: &DraftFolder) -> Result<Vec<FileRef>, AppError> {
        let dir = self.folder_path(folder);
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("no staged attachments at {}", dir.display()))
            } else {
                Self::storage_err(&dir, e)
            }
        })?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Self::storage_err(&dir, e))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| Self::storage_err(&entry.path(), e))?;
            if metadata.is_file() {
                files.push(FileRef {
                    filename: entry.file_name().to_string_lossy().into_owned(),
                    fileurl: None,
                    filesize: Some(metadata.len() as i64),
                });
            }
        }

        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }

    async fn delete_folder(&self, folder: &DraftFolder) -> Result<(), AppError> {
        let dir = self.folder_path(folder);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::storage_err(&dir, e)),
        }
    }
}
