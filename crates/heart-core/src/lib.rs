//! Gesture-driven interaction and animation engine.
//!
//! Platform-free core: gesture interpretation feeds a shared
//! [`InteractionState`]; render-side subsystems read it every tick and
//! produce instance buffers for a renderer.

pub mod audio;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod formation;
pub mod frame;
pub mod gesture;
pub mod history;
pub mod interpreter;
pub mod motion;
pub mod ornaments;
pub mod particles;
pub mod photos;
pub mod session;
pub mod state;

pub use audio::*;
pub use camera::*;
pub use config::*;
pub use error::*;
pub use formation::*;
pub use frame::*;
pub use gesture::*;
pub use history::*;
pub use interpreter::*;
pub use motion::*;
pub use ornaments::*;
pub use particles::*;
pub use photos::*;
pub use session::*;
pub use state::*;
