use glam::{Quat, Vec3};

/// Keyframe interpolation mode, as declared by the asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
    CubicSpline,
}

/// Decoded output track of one animation channel.
#[derive(Clone, Debug)]
pub enum ChannelOutputs {
    Translations(Vec<Vec3>),
    Rotations(Vec<Quat>),
    Scales(Vec<Vec3>),
}

/// Sampled value written back into a node's local TRS.
#[derive(Clone, Copy, Debug)]
pub enum SampledValue {
    Translation(Vec3),
    Rotation(Quat),
    Scale(Vec3),
}

/// One keyframed property of one target node.
#[derive(Clone, Debug)]
pub struct Channel {
    pub target_node: usize,
    /// Keyframe times in seconds, ascending.
    pub times: Vec<f32>,
    pub outputs: ChannelOutputs,
    pub interpolation: Interpolation,
}

/// An immutable named keyframe sequence extracted from the asset at load time.
#[derive(Clone, Debug)]
pub struct Clip {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<Channel>,
}

impl Channel {
    /// Number of output values per keyframe. Cubic-spline tracks store
    /// in-tangent, value, out-tangent triplets.
    fn output_stride(&self) -> usize {
        match self.interpolation {
            Interpolation::CubicSpline => 3,
            _ => 1,
        }
    }

    fn key_count(&self) -> usize {
        let values = match &self.outputs {
            ChannelOutputs::Translations(v) | ChannelOutputs::Scales(v) => v.len(),
            ChannelOutputs::Rotations(v) => v.len(),
        };
        (values / self.output_stride()).min(self.times.len())
    }

    /// Index of the value element for keyframe `key`. For cubic-spline
    /// tracks this is the middle element of the triplet.
    fn value_index(&self, key: usize) -> usize {
        match self.interpolation {
            Interpolation::CubicSpline => key * 3 + 1,
            _ => key,
        }
    }

    /// Samples the channel at time `t`, clamping outside the keyframe range.
    ///
    /// Linear tracks lerp (nlerp for rotations, shortest path). Step tracks
    /// hold the left keyframe. Cubic-spline tracks fall back to a linear
    /// blend of the value elements.
    pub fn sample(&self, t: f32) -> Option<SampledValue> {
        let keys = self.key_count();
        if keys == 0 {
            return None;
        }

        let (left, right, alpha) = self.locate(t, keys);
        let alpha = if self.interpolation == Interpolation::Step {
            0.0
        } else {
            alpha
        };

        let li = self.value_index(left);
        let ri = self.value_index(right);

        let value = match &self.outputs {
            ChannelOutputs::Translations(v) => {
                SampledValue::Translation(v[li].lerp(v[ri], alpha))
            }
            ChannelOutputs::Scales(v) => SampledValue::Scale(v[li].lerp(v[ri], alpha)),
            ChannelOutputs::Rotations(v) => {
                let a = v[li];
                // Take the shorter arc before blending
                let b = if a.dot(v[ri]) < 0.0 { -v[ri] } else { v[ri] };
                SampledValue::Rotation(a.lerp(b, alpha).normalize())
            }
        };
        Some(value)
    }

    /// Finds the keyframe pair bracketing `t` and the blend factor between
    /// them. Clamps to the first/last keyframe outside the range.
    fn locate(&self, t: f32, keys: usize) -> (usize, usize, f32) {
        if t <= self.times[0] || keys == 1 {
            return (0, 0, 0.0);
        }
        let last = keys - 1;
        if t >= self.times[last] {
            return (last, last, 0.0);
        }

        let right = self.times[..keys].partition_point(|&key| key <= t);
        let left = right - 1;
        let span = self.times[right] - self.times[left];
        let alpha = if span > 0.0 {
            (t - self.times[left]) / span
        } else {
            0.0
        };
        (left, right, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation_channel() -> Channel {
        Channel {
            target_node: 0,
            times: vec![0.0, 1.0, 2.0],
            outputs: ChannelOutputs::Translations(vec![
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 2.0, 0.0),
            ]),
            interpolation: Interpolation::Linear,
        }
    }

    fn unwrap_translation(value: SampledValue) -> Vec3 {
        match value {
            SampledValue::Translation(v) => v,
            other => panic!("expected translation, got {:?}", other),
        }
    }

    #[test]
    fn sample_at_keyframe_returns_exact_value() {
        let channel = translation_channel();
        let v = unwrap_translation(channel.sample(1.0).unwrap());
        assert!((v - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn sample_between_keyframes_interpolates() {
        let channel = translation_channel();
        let v = unwrap_translation(channel.sample(0.5).unwrap());
        assert!((v - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn sample_clamps_outside_keyframe_range() {
        let channel = translation_channel();
        let before = unwrap_translation(channel.sample(-1.0).unwrap());
        let after = unwrap_translation(channel.sample(10.0).unwrap());
        assert_eq!(before, Vec3::ZERO);
        assert!((after - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn step_channel_holds_left_keyframe() {
        let mut channel = translation_channel();
        channel.interpolation = Interpolation::Step;
        let v = unwrap_translation(channel.sample(0.9).unwrap());
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn rotation_sample_stays_normalized() {
        let channel = Channel {
            target_node: 0,
            times: vec![0.0, 1.0],
            outputs: ChannelOutputs::Rotations(vec![
                Quat::IDENTITY,
                Quat::from_rotation_y(std::f32::consts::PI * 0.75),
            ]),
            interpolation: Interpolation::Linear,
        };
        match channel.sample(0.5).unwrap() {
            SampledValue::Rotation(q) => assert!((q.length() - 1.0).abs() < 1e-5),
            other => panic!("expected rotation, got {:?}", other),
        }
    }

    #[test]
    fn cubic_spline_reads_value_elements() {
        // Triplets of (in-tangent, value, out-tangent) per keyframe
        let channel = Channel {
            target_node: 0,
            times: vec![0.0, 1.0],
            outputs: ChannelOutputs::Translations(vec![
                Vec3::splat(9.0),
                Vec3::ZERO,
                Vec3::splat(9.0),
                Vec3::splat(9.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::splat(9.0),
            ]),
            interpolation: Interpolation::CubicSpline,
        };
        let v = unwrap_translation(channel.sample(0.5).unwrap());
        assert!((v - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn empty_channel_yields_nothing() {
        let channel = Channel {
            target_node: 0,
            times: vec![],
            outputs: ChannelOutputs::Translations(vec![]),
            interpolation: Interpolation::Linear,
        };
        assert!(channel.sample(0.0).is_none());
    }
}
