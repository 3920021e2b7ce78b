//! Interactive core: render loop, key listener, display surface.
//!
//! Organized along the same pure/effect boundary throughout:
//! - `state`: what flows between the listener and the render loop
//! - `update`: key routing (pure)
//! - `view`: page arithmetic and frame layout (pure apart from drawing)
//! - `surface`, `keys`: the terminal seams, with in-memory doubles
//! - `run`: threads, tasks, terminal lifecycle, entry points

pub mod keys;
pub mod run;
pub mod state;
pub mod surface;
pub mod update;
pub mod view;
