// nbsmoke Infrastructure - HTTP Adapter
// Implements: NotebookFetcher

pub mod http_fetcher;

pub use http_fetcher::HttpFetcher;
