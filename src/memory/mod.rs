// Fri Oct 16 2026 - Alex

pub mod address;
pub mod error;
pub mod guest;
pub mod maps;
pub mod native;
pub mod protection;
pub mod region;
pub mod resolver;
pub mod scan;
pub mod traits;

#[cfg(test)]
pub(crate) mod simulated;

pub use address::Address;
pub use error::MemoryError;
pub use maps::MapsEnumerator;
#[cfg(any(target_os = "linux", windows))]
pub use native::NativeProcess;
pub use protection::Protection;
pub use region::{MemoryRegion, PageState, PageType};
pub use resolver::BaseResolver;
pub use traits::{ModuleInfo, ProcessAccess, RegionEnumerator};
