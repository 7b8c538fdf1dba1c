//! Local-disk storage for uploaded catalog files.
//!
//! Files live in a single folder under the content root and are served back
//! as `/<folder>/<file_name>`.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs as tokio_fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

pub const USER_CONTENT_FOLDER_NAME: &str = "user_content";

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Writes everything `reader` yields into `file_name`, replacing any existing file.
    async fn save_file(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        file_name: &str,
    ) -> io::Result<()>;

    /// Removes `file_name`. Missing files are not an error.
    async fn delete_file(&self, file_name: &str) -> io::Result<()>;

    fn get_file_url(&self, file_name: &str) -> String;
}

#[derive(Clone, Debug)]
pub struct FileStorageService {
    user_content_folder: PathBuf,
}

impl FileStorageService {
    pub fn new(content_root: impl AsRef<Path>) -> Self {
        Self {
            user_content_folder: content_root.as_ref().join(USER_CONTENT_FOLDER_NAME),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.user_content_folder
    }

    /// Resolves a stored file name to its path, rejecting anything that is
    /// not a bare file name.
    pub fn file_path(&self, file_name: &str) -> io::Result<PathBuf> {
        let is_bare = !file_name.is_empty()
            && Path::new(file_name)
                .file_name()
                .is_some_and(|name| name == file_name);
        if !is_bare || file_name == ".." {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid file name: {file_name}"),
            ));
        }
        Ok(self.user_content_folder.join(file_name))
    }
}

#[async_trait]
impl StorageService for FileStorageService {
    async fn save_file(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        file_name: &str,
    ) -> io::Result<()> {
        let path = self.file_path(file_name)?;
        tokio_fs::create_dir_all(&self.user_content_folder).await?;

        let mut file = tokio_fs::File::create(&path).await?;
        let written = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;

        tracing::debug!(file = %path.display(), bytes = written, "Saved file");
        Ok(())
    }

    async fn delete_file(&self, file_name: &str) -> io::Result<()> {
        let path = self.file_path(file_name)?;
        match tokio_fs::remove_file(&path).await {
            Ok(_) => {
                tracing::debug!(file = %path.display(), "Deleted file");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn get_file_url(&self, file_name: &str) -> String {
        format!("/{USER_CONTENT_FOLDER_NAME}/{file_name}")
    }
}
