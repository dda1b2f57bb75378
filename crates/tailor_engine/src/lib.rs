//! Resume tailor engine: HTTP submission, response resolution and downloads.
mod client;
mod controller;
mod download;
mod filename;
mod persist;
mod response;
mod types;

pub use client::{ClientSettings, ReqwestSubmissionClient, SubmissionClient, TAILOR_RESUME_PATH};
pub use controller::{SubmissionController, ViewSink};
pub use filename::artifact_filename;
pub use persist::{ensure_output_dir, ArtifactStore, PersistError, StagedArtifact};
pub use types::{ClientError, DownloadError, DownloadedArtifact, SubmitError};
