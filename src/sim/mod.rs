//! Game logic run once per tic.

pub mod collision;
mod components;
pub mod plats;
pub mod player;
mod tic;

pub use collision::{BBox, Body, MAX_STEP_HEIGHT, MoveOutcome, try_move};
pub use components::{Buttons, InputCmd};
pub use plats::{PlatKind, PlatResult, PlatStatus, PlatThinker, Plats};
pub use player::{PlayerConfig, PlayerState};
pub use tic::{SIM_FPS, TicRunner};
