//! Interaction loop driving a [`ViewSession`] from a scene view.
//!
//! The view owns the window and the event queue; the loop only waits for
//! events, asks the session whether the projection is stale and hands any
//! recomputed buffers back to the view.

use std::time::Duration;

use glam::Quat;
use skyview_healpix::PixelIndexMapper;
use skyview_projection::ProjectionBuffers;
use tracing::debug;

use crate::ViewSession;

/// How long each iteration blocks waiting for window events.
pub const POLL_INTERVAL: Duration = Duration::from_millis(18);

/// Scene orientation the viewer opens with.
pub const INITIAL_SCENE_ROTATION: Quat = Quat::from_xyzw(-0.5, -0.5, -0.5, 0.5);

/// The interactive scene as seen by the loop.
pub trait SceneView {
    /// True once the user has asked to close the view.
    fn ready_to_finish(&self) -> bool;

    /// Block for up to `timeout` processing window events.
    fn wait_events(&mut self, timeout: Duration);

    /// Current scene orientation.
    fn scene_rotation(&self) -> Quat;

    /// True while the user is dragging the scene.
    fn interaction_active(&self) -> bool;

    /// Replace the displayed projection and redraw.
    fn on_reprojected(&mut self, buffers: &ProjectionBuffers);
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Loop iterations run.
    pub iterations: u64,
    /// Iterations that recomputed the projection.
    pub reprojections: u64,
}

/// Run until the view reports it is finished.
pub fn run_view_loop<M, V>(session: &mut ViewSession<M>, view: &mut V) -> LoopStats
where
    M: PixelIndexMapper,
    V: SceneView,
{
    let mut stats = LoopStats::default();
    while !view.ready_to_finish() {
        view.wait_events(POLL_INTERVAL);
        stats.iterations += 1;

        let rotation = view.scene_rotation();
        if let Some(buffers) = session.tick(rotation, view.interaction_active()) {
            view.on_reprojected(buffers);
            stats.reprojections += 1;
        }
    }
    debug!(
        iterations = stats.iterations,
        reprojections = stats.reprojections,
        "view loop finished"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyview_config::ViewerConfig;
    use skyview_healpix::{PixelOrdering, SphericalField};
    use skyview_projection::ProjectionPanel;

    /// Replays a fixed script of `(rotation, dragging)` frames.
    struct ScriptedView {
        frames: Vec<(Quat, bool)>,
        cursor: usize,
        waited: Vec<Duration>,
        presented: usize,
    }

    impl ScriptedView {
        fn new(frames: Vec<(Quat, bool)>) -> Self {
            Self {
                frames,
                cursor: 0,
                waited: Vec::new(),
                presented: 0,
            }
        }

        fn current(&self) -> (Quat, bool) {
            self.frames[self.cursor - 1]
        }
    }

    impl SceneView for ScriptedView {
        fn ready_to_finish(&self) -> bool {
            self.cursor >= self.frames.len()
        }

        fn wait_events(&mut self, timeout: Duration) {
            self.waited.push(timeout);
            self.cursor += 1;
        }

        fn scene_rotation(&self) -> Quat {
            self.current().0
        }

        fn interaction_active(&self) -> bool {
            self.current().1
        }

        fn on_reprojected(&mut self, buffers: &ProjectionBuffers) {
            assert!(!buffers.is_empty());
            self.presented += 1;
        }
    }

    fn session() -> ViewSession {
        let config = ViewerConfig {
            projection: Some(ProjectionPanel::default()),
            ..Default::default()
        };
        let field = SphericalField::constant(1, PixelOrdering::Nest, 1.0);
        ViewSession::prepare(&config, field, "constant", Quat::IDENTITY).unwrap()
    }

    #[test]
    fn test_finished_view_runs_no_iterations() {
        let mut view = ScriptedView::new(Vec::new());
        let stats = run_view_loop(&mut session(), &mut view);
        assert_eq!(stats, LoopStats::default());
    }

    #[test]
    fn test_reprojects_after_drag_ends() {
        let turned = Quat::from_rotation_y(0.4);
        let mut view = ScriptedView::new(vec![
            (Quat::IDENTITY, false),
            (turned, true),
            (turned, true),
            (turned, false),
            (turned, false),
        ]);
        let mut session = session();
        let stats = run_view_loop(&mut session, &mut view);

        assert_eq!(stats.iterations, 5);
        assert_eq!(stats.reprojections, 1);
        assert_eq!(view.presented, 1);
        assert!(view.waited.iter().all(|&t| t == POLL_INTERVAL));
    }

    #[test]
    fn test_every_distinct_rotation_reprojects() {
        let frames = (1..=4)
            .map(|i| (Quat::from_rotation_z(i as f32 * 0.1), false))
            .collect();
        let mut view = ScriptedView::new(frames);
        let stats = run_view_loop(&mut session(), &mut view);
        assert_eq!(stats.reprojections, 4);
    }
}
