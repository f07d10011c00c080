//! Layered map-feature editor core.
//!
//! This crate holds the editing logic of a map application where users draw,
//! import, and edit geometric features organized into layers, exchanging
//! geometry as well-known text (WKT). Rendering is left to a host toolkit
//! behind the [`surface::Surface`] trait; the [`engine::Editor`] turns user
//! gestures and toolkit events into store mutations and returns
//! [`engine::Action`]s for the host to persist and display.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`engine::Editor`] and the actions it emits |
//! | [`doc`] | Features, layers, and the snapshot layer store |
//! | [`session`] | Live shapes projected from the active layer |
//! | [`selection`] | Selected feature indices |
//! | [`menu`] | Context menu state machine |
//! | [`boolean`] | Polygon difference |
//! | [`codec`] | WKT parse/serialize |
//! | [`import`] | Bulk import from delimited text |
//! | [`surface`] | Rendering-surface trait, styles, bounds |
//! | [`stats`] | Feature count and geodesic area |
//! | [`color`] | Feature color generation and parsing |
//! | [`config`] | Environment-driven editor configuration |
//! | [`consts`] | Shared constants (colors, stroke weights, messages) |

pub mod boolean;
pub mod codec;
pub mod color;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod import;
pub mod menu;
pub mod selection;
pub mod session;
pub mod stats;
pub mod surface;
