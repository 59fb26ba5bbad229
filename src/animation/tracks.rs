use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// How many neighbouring segments are scanned from the cached index before
/// falling back to a binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the segment found by the previous sample so that playback in
/// either direction resolves the next segment in O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// For `CubicSpline`, laid out as `[in_tangent, value, out_tangent]` per keyframe.
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Time of the last keyframe, or zero for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.values.is_empty()
    }

    /// Samples without a cursor (binary search every call).
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        let mut cursor = KeyframeCursor::default();
        self.sample_with_cursor(time, &mut cursor)
    }

    /// Samples the track at `time`, updating `cursor` to the resolved segment.
    ///
    /// Returns `None` for an empty track. Times outside the keyed range clamp
    /// to the first/last keyframe.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        if self.times.len() == 1 {
            return self.value_at(0);
        }

        let index = self
            .scan_near(time, cursor.last_index)
            .unwrap_or_else(|| self.times.partition_point(|&t| t <= time).saturating_sub(1));
        cursor.last_index = index;

        self.sample_segment(index, time)
    }

    /// Linear scan around `hint` in the direction of travel.
    fn scan_near(&self, time: f32, hint: usize) -> Option<usize> {
        let len = self.times.len();
        let hint = hint.min(len - 1);

        if time >= self.times[hint] {
            // Forward playback.
            (hint..=(hint + MAX_SCAN_OFFSET).min(len - 1))
                .find(|&idx| idx == len - 1 || time < self.times[idx + 1])
        } else {
            // Reverse playback: walk left until the segment start is behind `time`.
            (hint.saturating_sub(MAX_SCAN_OFFSET)..hint)
                .rev()
                .find(|&idx| time >= self.times[idx])
        }
    }

    fn value_at(&self, index: usize) -> Option<T> {
        let slot = match self.interpolation {
            InterpolationMode::CubicSpline => index * 3 + 1,
            _ => index,
        };
        self.values.get(slot).copied()
    }

    fn sample_segment(&self, index: usize, time: f32) -> Option<T> {
        let last = self.times.len() - 1;
        if index >= last {
            return self.value_at(last);
        }

        let next = index + 1;
        let t0 = self.times[index];
        let dt = self.times[next] - t0;
        let t = if dt > 1e-6 { ((time - t0) / dt).clamp(0.0, 1.0) } else { 0.0 };

        match self.interpolation {
            InterpolationMode::Step => self.value_at(index),
            InterpolationMode::Linear => {
                Some(T::interpolate_linear(self.value_at(index)?, self.value_at(next)?, t))
            }
            InterpolationMode::CubicSpline => {
                let a = index * 3;
                let b = next * 3;
                let v0 = *self.values.get(a + 1)?;
                let out_tangent0 = *self.values.get(a + 2)?;
                let in_tangent1 = *self.values.get(b)?;
                let v1 = *self.values.get(b + 1)?;
                Some(T::interpolate_cubic(v0, out_tangent0, in_tangent1, v1, t, dt))
            }
        }
    }
}
