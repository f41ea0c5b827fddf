// ABOUTME: Core library for floe, containing the portal's domain model.
// ABOUTME: Controlled vocabularies, spatial bounds, filter predicates, and the dataset index seam.

pub mod filter;
pub mod index;
pub mod limits;
pub mod spatial;
pub mod taxonomy;

pub use filter::{FilterQuery, YearSpan};
pub use index::{DatasetIndex, DatasetRecord, MemoryIndex};
pub use spatial::{BoundingBox, SpatialError, ZoneType};
pub use taxonomy::{Category, ExpeditionType, IsoTopic};
