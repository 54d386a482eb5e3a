//! Background Tasks Module
//!
//! # Tasks
//! - Token sweep: Removes expired verification codes at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
