//! Render and UI sinks for headless runs: everything goes to `tracing`.

use std::collections::HashSet;

use tracing::{info, trace, warn};

use gallery_core::ports::{RenderSink, UiSink, VisualDescriptor};
use gallery_core::types::{EntityId, Transform};

/// Tracks which visuals exist and logs their lifecycle at `trace`.
#[derive(Debug, Default)]
pub struct TracingRenderSink {
    live: HashSet<EntityId>,
    peak: usize,
}

impl TracingRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Most visuals alive at once.
    pub fn peak(&self) -> usize {
        self.peak
    }
}

impl RenderSink for TracingRenderSink {
    fn add_visual(&mut self, entity_id: EntityId, visual: &VisualDescriptor) {
        if !self.live.insert(entity_id) {
            warn!(entity_id = %entity_id, "visual added twice");
        }
        self.peak = self.peak.max(self.live.len());
        trace!(entity_id = %entity_id, kind = ?visual.kind, shape = ?visual.shape, "add visual");
    }

    fn remove_visual(&mut self, entity_id: EntityId) {
        if !self.live.remove(&entity_id) {
            warn!(entity_id = %entity_id, "remove for unknown visual");
        }
        trace!(entity_id = %entity_id, "remove visual");
    }

    fn sync_transform(&mut self, entity_id: EntityId, transform: &Transform) {
        trace!(entity_id = %entity_id, position = ?transform.position, "sync");
    }
}

/// Logs round notifications and remembers the last values.
#[derive(Debug, Default)]
pub struct TracingUiSink {
    pub score: u32,
    pub remaining_secs: f32,
    pub final_scores: Vec<u32>,
}

impl TracingUiSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiSink for TracingUiSink {
    fn on_score_changed(&mut self, score: u32) {
        self.score = score;
        info!(score, "score");
    }

    fn on_time_changed(&mut self, remaining_secs: f32) {
        self.remaining_secs = remaining_secs;
        // Every fifth second at info.
        if remaining_secs.fract() == 0.0 && remaining_secs as u32 % 5 == 0 {
            info!(remaining_secs, "time");
        }
    }

    fn on_round_ended(&mut self, final_score: u32) {
        self.final_scores.push(final_score);
        info!(final_score, "round over");
    }
}

#[cfg(test)]
mod tests {
    use gallery_core::enums::{EntityKind, TargetShape};
    use gallery_core::ports::ShapeDescriptor;
    use gallery_core::types::Color;

    use super::*;

    #[test]
    fn test_render_sink_tracks_live_and_peak() {
        let mut sink = TracingRenderSink::new();
        let visual = VisualDescriptor {
            kind: EntityKind::Target,
            shape: ShapeDescriptor::Target(TargetShape::Cone),
            color: Color::ORANGE,
        };
        sink.add_visual(EntityId(1), &visual);
        sink.add_visual(EntityId(2), &visual);
        sink.remove_visual(EntityId(1));
        assert_eq!(sink.live_count(), 1);
        assert_eq!(sink.peak(), 2);
    }

    #[test]
    fn test_ui_sink_keeps_last_values() {
        let mut ui = TracingUiSink::new();
        ui.on_score_changed(30);
        ui.on_time_changed(12.0);
        ui.on_round_ended(30);
        assert_eq!(ui.score, 30);
        assert_eq!(ui.remaining_secs, 12.0);
        assert_eq!(ui.final_scores, vec![30]);
    }
}
