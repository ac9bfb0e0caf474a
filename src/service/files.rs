//! Folder browsing, station settings and transfer statistics.

use crate::error::Result;
use crate::store::Action;
use crate::transport::{
    FileKind, FileList, FileListOption, FolderList, NewFolderList, StationConfig, StationInfo,
};
use crate::types::TaskStatistic;

use super::StationService;
use super::loading::GuardOptions;

/// Listing limit meaning "everything"
const ALL: u64 = 0;

/// Extra fields requested for folder listings
const FOLDER_FIELDS: [FileListOption; 1] = [FileListOption::Perm];

impl StationService {
    /// List shared folders, optionally only writable ones
    pub async fn list_folders(&self, readonly: bool) -> Result<FolderList> {
        self.ensure(GuardOptions::LOGGED_IN)?;
        Ok(self.transport.file.list_folder(0, ALL, readonly).await?)
    }

    /// List the content of `path`
    pub async fn list_files(&self, path: &str, kind: FileKind) -> Result<FileList> {
        self.ensure(GuardOptions::LOGGED_IN)?;
        Ok(self
            .transport
            .file
            .list_file(path, 0, ALL, kind, &FOLDER_FIELDS)
            .await?)
    }

    /// Create `name` under `path`
    pub async fn create_folder(
        &self,
        path: &str,
        name: &str,
        force_parent: bool,
    ) -> Result<NewFolderList> {
        self.ensure(GuardOptions::LOGGED_IN)?;
        tracing::debug!(path, name, "Creating folder");
        Ok(self
            .transport
            .file
            .create_folder(path, name, force_parent, &FOLDER_FIELDS)
            .await?)
    }

    /// Rename the folder at `path`
    pub async fn rename_folder(
        &self,
        path: &str,
        name: &str,
        search_task_id: Option<&str>,
    ) -> Result<FileList> {
        self.ensure(GuardOptions::LOGGED_IN)?;
        tracing::debug!(path, name, "Renaming folder");
        Ok(self
            .transport
            .file
            .rename_folder(path, name, &FOLDER_FIELDS, search_task_id)
            .await?)
    }

    /// Read the download station settings
    pub async fn get_config(&self) -> Result<StationConfig> {
        self.ensure(GuardOptions::LOGGED_IN)?;
        Ok(self.transport.download.get_config().await?)
    }

    /// Write the download station settings
    pub async fn set_config(&self, config: &StationConfig) -> Result<()> {
        self.ensure(GuardOptions::LOGGED_IN)?;
        Ok(self.transport.download.set_config(config).await?)
    }

    /// Read the download station version information
    pub async fn get_info(&self) -> Result<StationInfo> {
        self.ensure(GuardOptions::LOGGED_IN)?;
        Ok(self.transport.download.get_info().await?)
    }

    /// Fetch aggregate transfer speeds and record them in the store
    pub async fn get_statistic(&self) -> Result<TaskStatistic> {
        let stats = self
            .guard(GuardOptions::LOGGED_IN, async {
                Ok(self.transport.download.get_statistic().await?)
            })
            .await?;
        self.store.dispatch(Action::SetTaskStats(stats));
        Ok(stats)
    }
}
