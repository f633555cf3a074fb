//! End-to-end checks against the public library surface.

mod risk;
mod simulation;
