use anyhow::{bail, Result};
use log::info;

use crate::loaders::LoadedModel;
use crate::mixer::{Direction, Mixer};
use crate::picking::Hit;
use crate::scene::Scene;

/// Negligible mixer step applied right after a toggle so the new pose is
/// visible before the next regular frame instead of one frame late.
pub const POSE_SYNC_STEP: f32 = 0.001;

/// All cross-callback viewer state under one owner: the scene, the mixer,
/// and the playback direction flag. Lives from startup to teardown.
#[derive(Debug, Default)]
pub struct Session {
    pub scene: Scene,
    pub mixer: Mixer,
    next_direction: Direction,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction the next successful interaction will play in. Starts
    /// `Forward` and strictly alternates on every toggle.
    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    /// Accepts a finished load: validates the model, attaches it to the
    /// scene, and builds one paused action per clip.
    ///
    /// A model with a zero scale on any axis is rejected outright; nothing
    /// is attached and no actions are created.
    pub fn attach_model(&mut self, loaded: LoadedModel) -> Result<()> {
        if loaded.model.has_degenerate_scale() {
            bail!("model scale is zero on at least one axis, rejecting load");
        }

        info!(
            "model attached: {} nodes, {} meshes, {} animation clips",
            loaded.model.nodes.len(),
            loaded.model.meshes.len(),
            loaded.clips.len()
        );
        for clip in &loaded.clips {
            info!("loaded animation clip {:?} ({:.2}s)", clip.name, clip.duration);
        }

        self.scene.attach_model(loaded.model);
        self.mixer = Mixer::with_clips(loaded.clips);
        Ok(())
    }

    /// The Animation Toggle transition: restarts every action in the
    /// current direction, forces the pose with a negligible mixer step,
    /// then flips the direction flag. All actions change together.
    pub fn toggle_playback(&mut self) {
        if self.mixer.is_empty() {
            return;
        }
        let Some(model) = self.scene.model.as_mut() else {
            return;
        };

        self.mixer.play_all(self.next_direction);
        self.mixer.update(POSE_SYNC_STEP, model);
        self.next_direction = self.next_direction.flipped();
    }

    /// Outcome of a pick: toggles playback only when the nearest hit is a
    /// clickable surface and at least one action exists. Returns whether a
    /// toggle happened.
    pub fn handle_pick(&mut self, hit: Option<Hit>) -> bool {
        let Some(hit) = hit else {
            return false;
        };
        let clickable = self
            .scene
            .model
            .as_ref()
            .and_then(|model| model.meshes.get(hit.mesh))
            .is_some_and(|mesh| mesh.clickable);

        if clickable && !self.mixer.is_empty() {
            self.toggle_playback();
            true
        } else {
            false
        }
    }

    /// Per-frame time advancement; the only place animation time moves
    /// outside the toggle's pose-sync step.
    pub fn advance(&mut self, delta: f32) {
        if let Some(model) = self.scene.model.as_mut() {
            self.mixer.update(delta, model);
        }
    }
}
