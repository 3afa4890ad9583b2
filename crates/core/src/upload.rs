//! Upload a document to the model service and wait until it can be used.

use crate::service::ModelService;
use crate::types::{FileState, RemoteFile};
use crate::{Error, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// How often, and for how long, to poll a processing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Uploads files and polls them until the service reports them ready.
#[derive(Debug, Clone)]
pub struct UploadAdapter {
    policy: PollPolicy,
    max_bytes: Option<u64>,
}

impl UploadAdapter {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            max_bytes: None,
        }
    }

    /// Reject files larger than `bytes` before uploading.
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = Some(bytes);
        self
    }

    /// Upload `path` and block until the remote file is ready.
    pub fn upload(
        &self,
        service: &dyn ModelService,
        path: &Path,
        mime_type: &str,
    ) -> Result<RemoteFile> {
        if let Some(limit) = self.max_bytes {
            let size = std::fs::metadata(path)?.len();
            if size > limit {
                return Err(Error::FileTooLarge {
                    size_mb: size as f64 / (1024.0 * 1024.0),
                    limit_mb: limit / (1024 * 1024),
                });
            }
        }

        log::info!("Uploading {} as {}", path.display(), mime_type);
        let file = service.upload_file(path, mime_type)?;
        self.wait_until_ready(service, file)
    }

    /// Poll `file` at the policy interval until it leaves the processing state.
    pub fn wait_until_ready(
        &self,
        service: &dyn ModelService,
        mut file: RemoteFile,
    ) -> Result<RemoteFile> {
        let started = Instant::now();

        while file.is_processing() {
            let waited = started.elapsed();
            if waited >= self.policy.timeout {
                return Err(Error::UploadTimeout {
                    name: file.name,
                    waited,
                });
            }

            log::debug!("File {} still processing after {:?}", file.name, waited);
            std::thread::sleep(self.policy.interval);
            file = service.get_file(&file.name)?;
        }

        match file.state {
            FileState::Failed => Err(Error::FileProcessingFailed { name: file.name }),
            _ => {
                log::info!("File {} ready ({:?})", file.name, file.state);
                Ok(file)
            }
        }
    }
}

impl Default for UploadAdapter {
    fn default() -> Self {
        Self::new(PollPolicy::default())
    }
}
