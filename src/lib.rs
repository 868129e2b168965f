pub mod checksum;
pub mod config;
pub mod downloader;
pub mod input;
pub mod logging;
pub mod naming;

pub use config::Config;
pub use downloader::{
    DigestSet, DownloadError, Downloader, FileDownloader, Outcome, Report, Response, SkipReason,
    UReqFetcher, UrlOutcome,
};
