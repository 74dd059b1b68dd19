//! HTTP plumbing for pkgview: a shared blocking client, URL resolution and a
//! streaming downloader.

pub mod download;
pub mod error;
pub mod http;
pub mod http_client;
pub mod types;
pub mod utils;
