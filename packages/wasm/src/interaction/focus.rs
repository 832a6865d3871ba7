//! The focus state machine.
//!
//! ```text
//!            click X                  delay elapsed
//!   Idle ─────────────▶ Focusing(X) ───────────────▶ Idle  (completed X)
//!                         │     ▲
//!                         └─────┘
//!                  click Y: cancel X, focus Y
//! ```
//!
//! Beginning a focus writes the *target* layout into the engine at once and
//! keeps a [`Transition`] from the previous on-screen frames, so renderers
//! sample smooth intermediate frames while the engine already holds the
//! settled state. Only one completion is ever pending.

use rand::Rng;
use tracing::{debug, info, warn};

use super::displace::{DisplacementParams, plan_displacement};
use super::schedule::{Scheduler, TaskId};
use super::transition::{NodeFrame, Transition};
use crate::config::GraphConfig;
use crate::graph::{GraphEngine, NodeId};
use crate::layout::SafeArea;

/// An in-flight focus cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFocus {
    pub node: NodeId,
    /// Size field of the focused node before it was enlarged.
    pub original_size: f32,
    pub started_at: f64,
    /// Safe area captured when the click happened.
    pub bounds: SafeArea,
    task: TaskId,
    transition: Transition,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FocusState {
    #[default]
    Idle,
    Focusing(ActiveFocus),
}

/// Result of [`FocusController::begin`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusStarted {
    pub node: NodeId,
    /// The node whose pending cycle was cancelled by this click.
    pub cancelled: Option<NodeId>,
    /// Nodes that could not reach the minimum separation.
    pub crowded: usize,
}

/// Result of [`FocusController::poll`] when a cycle finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusCompleted {
    pub node: NodeId,
    pub started_at: f64,
}

/// Drives focus cycles over a [`GraphEngine`].
#[derive(Debug)]
pub struct FocusController {
    active_size: f32,
    animate_duration_ms: f64,
    redirect_delay_ms: f64,
    displacement: DisplacementParams,
    scheduler: Scheduler,
    state: FocusState,
}

impl FocusController {
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            active_size: config.active_size,
            animate_duration_ms: config.animate_duration_ms,
            redirect_delay_ms: config.redirect_delay_ms,
            displacement: DisplacementParams::from_config(config),
            scheduler: Scheduler::new(),
            state: FocusState::Idle,
        }
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn is_focusing(&self) -> bool {
        matches!(self.state, FocusState::Focusing(_))
    }

    pub fn focused(&self) -> Option<NodeId> {
        match &self.state {
            FocusState::Focusing(active) => Some(active.node),
            FocusState::Idle => None,
        }
    }

    /// When the pending completion fires.
    pub fn due_at(&self) -> Option<f64> {
        self.scheduler.due_at()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Focus `node` at time `now`.
    ///
    /// A cycle already in flight is cancelled first: its completion never
    /// fires and the frames on screen at `now` become the starting point of
    /// the new animation.
    pub fn begin<R: Rng + ?Sized>(
        &mut self,
        engine: &mut GraphEngine,
        node: NodeId,
        now: f64,
        safe: SafeArea,
        rng: &mut R,
    ) -> FocusStarted {
        let (cancelled, baseline) = match self.interrupt(engine, now) {
            Some((node, frames)) => (Some(node), frames),
            None => (None, current_frames(engine)),
        };

        let original_size = engine.size(node).unwrap_or(self.active_size);
        if let Some(state) = engine.state_mut(node) {
            state.set_locked(true);
            state.set_focused(true);
        }
        engine.set_size(node, self.active_size);

        let focus_at = engine.position(node).unwrap_or_else(|| safe.center());
        let others: Vec<_> = engine
            .node_ids()
            .filter(|&id| !engine.state(id).is_locked())
            .filter_map(|id| Some((id, engine.position(id)?, engine.size(id)?)))
            .collect();

        let planned = plan_displacement(focus_at, &others, &safe, &self.displacement, rng);
        let mut crowded = 0;
        for displaced in &planned {
            engine.set_position(displaced.id, displaced.position);
            engine.set_size(displaced.id, displaced.size);
            if !displaced.clear {
                crowded += 1;
            }
        }
        if crowded > 0 {
            warn!(
                node = %node,
                crowded,
                "no collision-free spot within retry budget; kept closest candidates"
            );
        }

        let transition = Transition::new(now, self.animate_duration_ms, baseline, current_frames(engine));
        let task = self.scheduler.schedule(now + self.redirect_delay_ms);
        self.state = FocusState::Focusing(ActiveFocus {
            node,
            original_size,
            started_at: now,
            bounds: safe,
            task,
            transition,
        });

        info!(node = %node, displaced = planned.len(), due_at = now + self.redirect_delay_ms, "focus started");
        FocusStarted {
            node,
            cancelled,
            crowded,
        }
    }

    /// Complete the pending cycle if its delay has elapsed.
    ///
    /// The focused node is unlocked and its size field restored; every other
    /// node keeps its displaced position and size.
    pub fn poll(&mut self, engine: &mut GraphEngine, now: f64) -> Option<FocusCompleted> {
        let fired = self.scheduler.poll(now)?;
        let FocusState::Focusing(active) = std::mem::take(&mut self.state) else {
            return None;
        };
        if active.task != fired {
            warn!(task = %fired, "stale focus task fired");
            self.state = FocusState::Focusing(active);
            return None;
        }

        release(engine, &active);
        debug!(node = %active.node, "focus completed");
        Some(FocusCompleted {
            node: active.node,
            started_at: active.started_at,
        })
    }

    /// Abandon the in-flight cycle, freezing nodes where they appear at `now`.
    pub fn cancel(&mut self, engine: &mut GraphEngine, now: f64) -> Option<NodeId> {
        self.interrupt(engine, now).map(|(node, _)| node)
    }

    /// Cancel and hand back the frames on screen at `now`.
    ///
    /// Positions are frozen into the engine. Size fields are not: the focused
    /// node gets its resting size back, so the returned frames are the only
    /// record of its on-screen size.
    fn interrupt(&mut self, engine: &mut GraphEngine, now: f64) -> Option<(NodeId, Vec<NodeFrame>)> {
        self.scheduler.cancel();
        let FocusState::Focusing(active) = std::mem::take(&mut self.state) else {
            return None;
        };

        let frames = active.transition.sample(now);
        for (slot, frame) in frames.iter().enumerate() {
            engine.set_position(NodeId(slot as u32), frame.position);
        }
        release(engine, &active);
        info!(node = %active.node, "focus cancelled");
        Some((active.node, frames))
    }

    /// Drop any cycle without touching the engine. Used when the graph is
    /// about to be replaced.
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.state = FocusState::Idle;
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// Frames to draw at `now`, one per node slot.
    pub fn sample(&self, engine: &GraphEngine, now: f64) -> Vec<NodeFrame> {
        match &self.state {
            FocusState::Focusing(active) => active.transition.sample(now),
            FocusState::Idle => current_frames(engine),
        }
    }
}

fn current_frames(engine: &GraphEngine) -> Vec<NodeFrame> {
    engine
        .node_ids()
        .filter_map(|id| Some(NodeFrame::new(engine.position(id)?, engine.size(id)?)))
        .collect()
}

fn release(engine: &mut GraphEngine, active: &ActiveFocus) {
    if let Some(state) = engine.state_mut(active.node) {
        state.set_locked(false);
        state.set_focused(false);
    }
    engine.set_size(active.node, active.original_size);
}
