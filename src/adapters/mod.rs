// Adapters layer: concrete implementations of the domain ports
// (persistence, image analysis, listeners).

pub mod analyzer;
pub mod file;
pub mod http;
pub mod listener;
pub mod memory;

pub use analyzer::{ConfiguredAnalyzer, StaticImageAnalyzer};
pub use file::JsonFileRepository;
pub use http::HttpImageAnalyzer;
pub use listener::TracingListener;
pub use memory::InMemoryRepository;
