//! Hand-off of local browser downloads to the server.

use async_trait::async_trait;

use crate::error::Result;

use super::StationService;
use super::tasks::NewTask;

/// Control over the host's local download manager
#[async_trait]
pub trait LocalDownloads: Send + Sync {
    /// Pause a local download
    async fn pause(&self, id: u64) -> Result<()>;

    /// Resume a paused local download
    async fn resume(&self, id: u64) -> Result<()>;

    /// Remove a local download from the history
    async fn erase(&self, id: u64) -> Result<()>;
}

/// A local download as seen by the host
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadItem {
    /// Local download ID
    pub id: u64,
    /// URL after redirects
    pub final_url: String,
    /// Page that started the download
    pub referrer: Option<String>,
}

/// What to do with the local download once the transfer settled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterceptOptions {
    /// Erase the local download once the remote task exists
    pub erase: bool,
    /// Resume the local download if the remote task could not be created
    pub resume: bool,
}

impl StationService {
    /// Move a local download to the server
    ///
    /// The local download is paused first, then a task is created from its
    /// final URL with the referrer as source. A failed pause counts as a failed
    /// transfer. Follow-up resume/erase failures are logged and do not change
    /// the result.
    pub async fn intercept_download(
        &self,
        downloads: &dyn LocalDownloads,
        item: &DownloadItem,
        options: InterceptOptions,
    ) -> Result<()> {
        let task = NewTask {
            uri: item.final_url.clone(),
            source: item.referrer.clone(),
            ..Default::default()
        };

        let result = match downloads.pause(item.id).await {
            Ok(()) => self.create_task(task).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::debug!(download_id = item.id, "Download intercepted and transferred");
                if options.erase
                    && let Err(e) = downloads.erase(item.id).await
                {
                    tracing::warn!(download_id = item.id, error = %e, "Failed to erase local download");
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(download_id = item.id, error = %e, "Failed to transfer download");
                if options.resume
                    && let Err(resume_err) = downloads.resume(item.id).await
                {
                    tracing::warn!(download_id = item.id, error = %resume_err, "Failed to resume local download");
                }
                Err(e)
            }
        }
    }
}
