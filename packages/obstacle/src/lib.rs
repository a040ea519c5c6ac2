//! Map obstacle geometry and collision queries, centered on teleporters.
//!
//! A teleporter is a rectangular frame standing on the map: two posts joined
//! by a crossbar, with an opening in between that tanks and shots can pass
//! through. Passing through the opening moves the traveler to the linked
//! teleporter. The gist is:
//!
//! - Oriented shapes are described the map-file way: a base center position,
//!   a rotation about Z, half extents along local X and Y, and a full height.
//!   The low-level tests on such shapes live in `intersect`.
//! - Every solid thing on the map implements the `Obstacle` trait, which is
//!   what movement and shot code query against.
//! - `Teleporter` implements `Obstacle` for the frame, and adds the queries
//!   for passing through the opening and re-mapping a position onto the
//!   destination. Its two opening surfaces are `MeshFace` quads.
//! - A `TeleporterSet` owns every teleporter on a map together with the
//!   `LinkTable` saying where each face leads.

#[macro_use]
extern crate tracing;

pub mod ray;
pub mod intersect;
pub mod extents;
pub mod obstacle;
pub mod mesh_face;
pub mod transform;
pub mod teleporter;
pub mod links;
pub mod world;
pub mod obj;


/// Common re-exports.
pub mod prelude {
    pub use super::{
        ray::Ray,
        extents::Extents,
        obstacle::{
            Obstacle,
            ObstacleKind,
            PassFlags,
        },
        mesh_face::MeshFace,
        transform::MeshTransform,
        teleporter::{
            Teleporter,
            Face,
        },
        links::{
            LinkId,
            LinkTable,
        },
        world::{
            TeleporterSet,
            Teleport,
            WorldError,
        },
        obj::ObjCounter,
    };
}
