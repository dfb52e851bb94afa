//! ClipWise engine: clip-service requests, clip downloads and platform
//! side effects, executed on a background runtime.
mod download;
mod engine;
mod fetch;
mod filename;
mod persist;
mod platform;
mod submit;
mod types;

pub use download::{
    ChannelProgressSink, DownloadSettings, Downloader, ProgressSink, ReqwestDownloader,
};
pub use engine::{EngineConfig, EngineHandle};
pub use fetch::HttpSettings;
pub use filename::clip_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError, StagedFile};
pub use platform::{ArboardClipboard, Clipboard, ShareSheet, UnavailableShareSheet};
pub use submit::{ReqwestSubmitter, SubmitSettings, Submitter};
pub use types::{
    ClipKey, DownloadProgress, EngineEvent, FailureKind, FetchError, PlatformError, RequestId,
    ShareRequest, ShareStatus,
};
