//! Collaborators the simulation calls out through.
//!
//! The core never talks to a renderer, DOM or sensor directly. It calls a
//! `RenderSink` for visuals, a `UiSink` for round notifications, and samples
//! an `InputSource` once per tick. Null and recording implementations live
//! here too; the recording ones back the invariant checks in tests.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::commands::InputSnapshot;
use crate::enums::{EntityKind, TargetShape};
use crate::types::{Color, EntityId, Transform};

/// Geometry the renderer should build for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeDescriptor {
    Target(TargetShape),
    Sphere { radius: f32 },
    Cube { half_extent: f32 },
}

/// Everything a renderer needs to create a visual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualDescriptor {
    pub kind: EntityKind,
    pub shape: ShapeDescriptor,
    pub color: Color,
}

/// Visual side of an entity. One visual per live entity.
pub trait RenderSink {
    fn add_visual(&mut self, entity_id: EntityId, visual: &VisualDescriptor);
    fn remove_visual(&mut self, entity_id: EntityId);
    fn sync_transform(&mut self, entity_id: EntityId, transform: &Transform);
}

/// Fire-and-forget round notifications.
pub trait UiSink {
    fn on_score_changed(&mut self, score: u32);
    fn on_time_changed(&mut self, remaining_secs: f32);
    fn on_round_ended(&mut self, final_score: u32);
}

/// Produces one input snapshot per tick.
pub trait InputSource {
    fn sample(&mut self) -> InputSnapshot;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn add_visual(&mut self, _entity_id: EntityId, _visual: &VisualDescriptor) {}
    fn remove_visual(&mut self, _entity_id: EntityId) {}
    fn sync_transform(&mut self, _entity_id: EntityId, _transform: &Transform) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullUiSink;

impl UiSink for NullUiSink {
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_time_changed(&mut self, _remaining_secs: f32) {}
    fn on_round_ended(&mut self, _final_score: u32) {}
}

/// Tracks live visuals and counts every misuse of the contract.
#[derive(Debug, Default)]
pub struct RecordingRenderSink {
    pub live: HashMap<EntityId, VisualDescriptor>,
    pub last_transform: HashMap<EntityId, Transform>,
    pub added: u64,
    pub removed: u64,
    pub syncs: u64,
    /// `add_visual` for an id that already had one.
    pub duplicate_adds: u64,
    /// `remove_visual` or `sync_transform` for an id with no visual.
    pub orphan_calls: u64,
}

impl RecordingRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn has_visual(&self, entity_id: EntityId) -> bool {
        self.live.contains_key(&entity_id)
    }

    pub fn live_of_kind(&self, kind: EntityKind) -> usize {
        self.live.values().filter(|v| v.kind == kind).count()
    }
}

impl RenderSink for RecordingRenderSink {
    fn add_visual(&mut self, entity_id: EntityId, visual: &VisualDescriptor) {
        self.added += 1;
        if self.live.insert(entity_id, *visual).is_some() {
            self.duplicate_adds += 1;
        }
    }

    fn remove_visual(&mut self, entity_id: EntityId) {
        self.removed += 1;
        self.last_transform.remove(&entity_id);
        if self.live.remove(&entity_id).is_none() {
            self.orphan_calls += 1;
        }
    }

    fn sync_transform(&mut self, entity_id: EntityId, transform: &Transform) {
        self.syncs += 1;
        if !self.live.contains_key(&entity_id) {
            self.orphan_calls += 1;
            return;
        }
        self.last_transform.insert(entity_id, *transform);
    }
}

/// Keeps every notification in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingUiSink {
    pub scores: Vec<u32>,
    pub times: Vec<f32>,
    pub round_ends: Vec<u32>,
}

impl RecordingUiSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiSink for RecordingUiSink {
    fn on_score_changed(&mut self, score: u32) {
        self.scores.push(score);
    }

    fn on_time_changed(&mut self, remaining_secs: f32) {
        self.times.push(remaining_secs);
    }

    fn on_round_ended(&mut self, final_score: u32) {
        self.round_ends.push(final_score);
    }
}

/// Replays queued snapshots, then idles with the last aim.
#[derive(Debug, Default, Clone)]
pub struct QueuedInput {
    queue: VecDeque<InputSnapshot>,
    last: InputSnapshot,
}

impl QueuedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, input: InputSnapshot) {
        self.queue.push_back(input);
    }
}

impl InputSource for QueuedInput {
    fn sample(&mut self) -> InputSnapshot {
        match self.queue.pop_front() {
            Some(input) => {
                self.last = InputSnapshot::idle(input.aim);
                input
            }
            None => self.last,
        }
    }
}
