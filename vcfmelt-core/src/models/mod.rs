pub mod chunk;
pub mod variant;

// re-export for cleaner imports
pub use self::chunk::{RawChunk, RawChunkRow};
pub use self::variant::VariantKey;
