#[cfg(feature = "core")]
#[doc(inline)]
pub use vcfmelt_core as core;

#[cfg(feature = "annotate")]
#[doc(inline)]
pub use vcfmelt_annotate as annotate;

#[cfg(feature = "io")]
#[doc(inline)]
pub use vcfmelt_io as io;
