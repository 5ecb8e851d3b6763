//! Platform module - window, input and timing state owned by the engine.
//!
//! These types carry no windowing-system handles. The backend fills them from
//! its event loop; exercises read them every frame.

mod config;
mod fps;
mod input;
mod window_state;

pub use config::{EngineConfig, EngineStatus};
pub use fps::{FpsCounter, FrameClock, FPS_UPDATE_INTERVAL};
pub use input::InputState;
pub use window_state::WindowState;

// Key and button identifiers used by InputState
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
