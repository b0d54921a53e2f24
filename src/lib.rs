//! Arcade survival core: a ship dodges waves of spinning obstacles and picks
//! up timed power-ups. The library holds the deterministic game rules; the
//! `asteroid_dodger` binary wraps them in a terminal front end.

pub mod audio;
pub mod collision;
pub mod effects;
pub mod entities;
pub mod events;
pub mod modes;
pub mod motion;
pub mod run;
pub mod settings;
pub mod spawner;
pub mod store;
pub mod waves;
