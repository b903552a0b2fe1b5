//! Pure planning rules: budget aggregation, the sharing permission model and
//! the friend request state machine. Nothing in here performs I/O, so every
//! function can be called from any worker without coordination.

pub mod budget;
pub mod friendship;
pub mod sharing;
