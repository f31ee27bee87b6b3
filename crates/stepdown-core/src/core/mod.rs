//! Pass event model
//!
//! The depth-pass engine reports its per-line decisions as [`PassEvent`]s
//! through an [`EventDispatcher`]. Whoever is interested registers a
//! [`PassListener`].

pub mod event;
pub mod listener;
