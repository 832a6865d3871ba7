//! Click-driven focus interaction.
//!
//! A click enlarges one node, pushes every other node to a nearby
//! collision-free spot and, once a fixed delay has elapsed, reports the cycle
//! as complete so the host can navigate. A second click before that point
//! cancels the first cycle outright.

pub mod displace;
pub mod focus;
pub mod schedule;
pub mod transition;

pub use displace::{DisplacementParams, Displaced, plan_displacement};
pub use focus::{FocusCompleted, FocusController, FocusStarted, FocusState};
pub use schedule::{Clock, ManualClock, Scheduler, SystemClock, TaskId};
pub use transition::{NodeFrame, Transition, ease_in_out};
