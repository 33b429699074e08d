//! Headless driver for the tiny-planet walk: world generation, scripted
//! input, the fixed-timestep loop and the renderer seam.

pub mod error;
pub mod game_loop;
pub mod render;
pub mod route;
pub mod session;
pub mod world;

pub use error::GameError;
pub use render::{FrameSink, FrameSnapshot, TraceFrameSink};
pub use route::{Route, RouteStep};
pub use session::{RunSummary, Session};
pub use world::World;
