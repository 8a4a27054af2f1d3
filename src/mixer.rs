use crate::animation::{Clip, SampledValue};
use crate::scene::Model;

/// Playback direction for a one-shot run through a clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Per-clip playback cursor. One action exists per clip; all of them are
/// reconfigured together, never individually.
#[derive(Clone, Copy, Debug)]
pub struct Action {
    /// Cursor position in seconds, always within `[0, clip.duration]`.
    pub time: f32,
    /// +1.0 forward, -1.0 reverse.
    pub time_scale: f32,
    pub paused: bool,
    pub enabled: bool,
    /// Set once playback has been requested; a started action keeps
    /// contributing its (possibly clamped) pose to the model.
    pub started: bool,
}

impl Action {
    fn new() -> Self {
        Self {
            time: 0.0,
            time_scale: 1.0,
            paused: true,
            enabled: true,
            started: false,
        }
    }
}

/// Advances actions and writes the sampled pose into the model hierarchy.
/// Plays every clip once per request, clamping at the finished frame.
#[derive(Clone, Debug, Default)]
pub struct Mixer {
    clips: Vec<Clip>,
    actions: Vec<Action>,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds one paused action per clip.
    pub fn with_clips(clips: Vec<Clip>) -> Self {
        let actions = clips.iter().map(|_| Action::new()).collect();
        Self { clips, actions }
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Restarts every action in `direction`: forward runs start at zero with
    /// rate +1, reverse runs start at the clip duration with rate -1. No
    /// partial application; all actions change together.
    pub fn play_all(&mut self, direction: Direction) {
        for (action, clip) in self.actions.iter_mut().zip(&self.clips) {
            match direction {
                Direction::Forward => {
                    action.time = 0.0;
                    action.time_scale = 1.0;
                }
                Direction::Reverse => {
                    action.time = clip.duration;
                    action.time_scale = -1.0;
                }
            }
            action.enabled = true;
            action.paused = false;
            action.started = true;
        }
    }

    /// Advances every running action by `delta` seconds of wall-clock time
    /// and applies the resulting pose to the model.
    pub fn update(&mut self, delta: f32, model: &mut Model) {
        for (action, clip) in self.actions.iter_mut().zip(&self.clips) {
            if !action.enabled || action.paused {
                continue;
            }

            action.time += delta * action.time_scale;

            // Loop-once with clamp: pause at the boundary, hold the pose.
            if action.time_scale >= 0.0 && action.time >= clip.duration {
                action.time = clip.duration;
                action.paused = true;
            } else if action.time_scale < 0.0 && action.time <= 0.0 {
                action.time = 0.0;
                action.paused = true;
            }
        }

        for (action, clip) in self.actions.iter().zip(&self.clips) {
            if !action.enabled || !action.started {
                continue;
            }
            for channel in &clip.channels {
                let Some(value) = channel.sample(action.time) else {
                    continue;
                };
                let Some(node) = model.nodes.get_mut(channel.target_node) else {
                    continue;
                };
                match value {
                    SampledValue::Translation(v) => node.translation = v,
                    SampledValue::Rotation(q) => node.rotation = q,
                    SampledValue::Scale(v) => node.scale = v,
                }
            }
        }

        model.update_global_transforms();
    }
}
