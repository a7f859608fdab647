// Services for fetching, unpacking and verifying the GR runtime

pub mod downloader;
pub mod extractor;
pub mod installer;
pub mod manifest;
pub mod runtime_locator;
