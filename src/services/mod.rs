pub mod browser;
pub mod extractor;
pub mod fetcher;
pub mod runner;
pub mod storage;
pub mod targets;
