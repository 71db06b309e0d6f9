//! Ear-clipping triangulation of simple polygons, plus the thin service shell
//! that fetches point sets, decodes them and encodes results.
//!
//! Layout
//! - `geometry`: `Point`, `Triangle`, `Winding`, eps-aware predicates.
//! - `triangulate`: preprocessing, ear test, clipping loop, `compute_triangulation`.
//! - `codec`: big-endian point-set / triangulation wire formats.
//! - `service`: point-set ids and sources, `ServiceCfg`, the `Triangulator`
//!   request boundary with its error-to-status mapping.
//! - `rand`: reproducible random star-shaped polygons.
//!
//! The core (`geometry`, `triangulate`) is pure and shares no state between
//! calls; it is safe to run concurrently on independent inputs.

pub mod codec;
pub mod geometry;
pub mod rand;
pub mod service;
pub mod triangulate;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geometry::{Point, Triangle, Winding, EPS};
pub use triangulate::{compute_triangulation, Triangulation};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::codec::{
        decode_point_set, decode_triangulation, encode_point_set, encode_triangulation,
        CodecError,
    };
    pub use crate::geometry::{Point, Triangle, Winding, EPS};
    pub use crate::rand::{draw_star_polygon, ReplayToken, StarCfg, VertexCount};
    pub use crate::service::{
        DirSource, MemorySource, PointSetId, PointSetSource, Response, ServiceCfg, ServiceError,
        Triangulator,
    };
    pub use crate::triangulate::{compute_triangulation, Triangulation};
}
