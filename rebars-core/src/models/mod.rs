pub mod region;
pub mod variant;

// re-export for cleaner imports
pub use self::region::Region;
pub use self::variant::{VariantRecord, VariantSet};
