pub mod cache;
pub mod error;
pub mod index;
pub mod ingest;
pub mod location;
pub mod platform;
pub mod service;

pub use cache::{CacheConfig, SearchCache};
pub use error::{PlatformError, Result};
pub use index::{IndexSnapshot, LocationIndex};
pub use ingest::{parse_dataset, parse_line, read_dataset, ParsedDataset, SkippedLine, UploadPolicy};
pub use location::{Ancestors, Location};
pub use platform::{Platform, PlatformRecord};
pub use service::{IndexStats, LoadReport, PlatformService};
