// Application Layer - the sequential smoke-test runner

pub mod cleanup;
pub mod constants;
pub mod runner;

pub use cleanup::FetchedFile;
pub use runner::SmokeRunner;
