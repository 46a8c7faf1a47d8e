//! Strip compositor: stacks captured photos into one bordered, labeled JPEG.

/// Premultiplied source-over blending.
pub mod blend;
/// Strip assembly.
pub mod compose;
/// JPEG and data URL encoding.
pub mod data_url;
/// Label text rasterisation.
pub mod label;
/// Strip geometry.
pub mod layout;
