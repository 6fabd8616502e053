//! Gain envelopes
//!
//! An envelope is an ordered list of `(time, value)` control points, with
//! times relative to the envelope's offset (the start of the clip it
//! belongs to). While a point is being dragged it may be temporarily hidden
//! from queries; it is deleted for good when the drag ends outside the row.

use serde::{Deserialize, Serialize};

/// Two points closer than this are treated as the same time
const TIME_EPSILON: f64 = 1.0e-9;

/// Envelope control point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvPoint {
    /// Seconds from the envelope offset
    pub time: f64,
    pub value: f64,
}

/// Interpolation between neighbouring points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    #[default]
    Linear,
    /// Geometric interpolation, used for speed curves
    Exponential,
}

/// Piecewise gain curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    points: Vec<EnvPoint>,
    offset: f64,
    min_value: f64,
    max_value: f64,
    default_value: f64,
    interpolation: Interpolation,
    #[serde(skip)]
    drag_point: Option<usize>,
    #[serde(skip)]
    drag_point_valid: bool,
}

impl Default for Envelope {
    /// Clip gain envelope: 0..2, unity when empty
    fn default() -> Self {
        Self::new(0.0, 2.0, 1.0)
    }
}

impl Envelope {
    pub fn new(min_value: f64, max_value: f64, default_value: f64) -> Self {
        Self {
            points: Vec::new(),
            offset: 0.0,
            min_value,
            max_value,
            default_value: default_value.clamp(min_value, max_value),
            interpolation: Interpolation::Linear,
            drag_point: None,
            drag_point_valid: false,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        for (time, value) in points {
            self.insert_or_replace(time, value);
        }
        self
    }

    pub fn points(&self) -> &[EnvPoint] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&EnvPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    #[inline]
    pub fn clamp_value(&self, value: f64) -> f64 {
        value.clamp(self.min_value, self.max_value)
    }

    /// Envelope value at an absolute time
    pub fn value_at(&self, time: f64) -> f64 {
        let t = time - self.offset;
        let hidden = self.hidden_point();

        let mut prev: Option<&EnvPoint> = None;
        for (i, p) in self.points.iter().enumerate() {
            if Some(i) == hidden {
                continue;
            }
            if p.time > t {
                let value = match prev {
                    None => p.value,
                    Some(a) => self.interpolate(a, p, t),
                };
                return self.clamp_value(value);
            }
            prev = Some(p);
        }

        self.clamp_value(prev.map_or(self.default_value, |p| p.value))
    }

    fn interpolate(&self, a: &EnvPoint, b: &EnvPoint, t: f64) -> f64 {
        let frac = (t - a.time) / (b.time - a.time);
        match self.interpolation {
            Interpolation::Exponential if a.value > 0.0 && b.value > 0.0 => {
                a.value * (b.value / a.value).powf(frac)
            }
            _ => a.value + (b.value - a.value) * frac,
        }
    }

    /// Add a point at a relative time, or overwrite the value of a point
    /// already there. Returns the point index.
    pub fn insert_or_replace(&mut self, time: f64, value: f64) -> usize {
        let value = self.clamp_value(value);

        if let Some(i) = self
            .points
            .iter()
            .position(|p| (p.time - time).abs() < TIME_EPSILON)
        {
            self.points[i].value = value;
            return i;
        }

        let idx = self.points.partition_point(|p| p.time <= time);
        self.points.insert(idx, EnvPoint { time, value });
        self.drag_point = self.drag_point.map(|d| if d >= idx { d + 1 } else { d });
        idx
    }

    /// Move a point, keeping it between its neighbours and inside the range
    pub fn move_point(&mut self, index: usize, time: f64, value: f64) -> bool {
        if index >= self.points.len() {
            return false;
        }
        let lo = if index > 0 {
            self.points[index - 1].time
        } else {
            0.0
        };
        let hi = self
            .points
            .get(index + 1)
            .map_or(f64::INFINITY, |p| p.time);

        let value = self.clamp_value(value);
        let point = &mut self.points[index];
        point.time = time.max(lo).min(hi);
        point.value = value;
        true
    }

    pub fn delete(&mut self, index: usize) -> Option<EnvPoint> {
        if index >= self.points.len() {
            return None;
        }
        let removed = self.points.remove(index);
        self.drag_point = match self.drag_point {
            Some(d) if d == index => None,
            Some(d) if d > index => Some(d - 1),
            other => other,
        };
        Some(removed)
    }

    /// Shift every point after `at` (relative time) right by `len` seconds
    pub fn insert_space(&mut self, at: f64, len: f64) {
        for p in self.points.iter_mut().filter(|p| p.time > at) {
            p.time += len;
        }
    }

    pub fn drag_point(&self) -> Option<usize> {
        self.drag_point
    }

    pub fn set_drag_point(&mut self, index: Option<usize>) {
        self.drag_point = index.filter(|&i| i < self.points.len());
        self.drag_point_valid = self.drag_point.is_some();
    }

    /// Hide (false) or show (true) the drag point in queries
    pub fn set_drag_point_valid(&mut self, valid: bool) {
        self.drag_point_valid = valid && self.drag_point.is_some();
    }

    pub fn is_drag_point_valid(&self) -> bool {
        self.drag_point_valid
    }

    /// End a drag; a point left hidden is deleted
    pub fn clear_drag_point(&mut self) {
        if let Some(index) = self.hidden_point() {
            self.points.remove(index);
        }
        self.drag_point = None;
        self.drag_point_valid = false;
    }

    fn hidden_point(&self) -> Option<usize> {
        self.drag_point.filter(|_| !self.drag_point_valid)
    }

    /// Copy for undo history, without any in-progress drag
    pub fn snapshot(&self) -> Self {
        let mut copy = self.clone();
        copy.drag_point = None;
        copy.drag_point_valid = false;
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> Envelope {
        Envelope::default().with_points([(0.0, 0.0), (1.0, 1.0)])
    }

    #[test]
    fn test_empty_envelope_is_default() {
        let env = Envelope::default();
        assert_eq!(env.value_at(3.0), 1.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let env = ramp();
        assert_relative_eq!(env.value_at(0.5), 0.5);
        assert_eq!(env.value_at(-1.0), 0.0);
        assert_eq!(env.value_at(5.0), 1.0);
    }

    #[test]
    fn test_offset() {
        let mut env = ramp();
        env.set_offset(10.0);
        assert_relative_eq!(env.value_at(10.25), 0.25);
        assert_eq!(env.value_at(0.0), 0.0);
    }

    #[test]
    fn test_exponential() {
        let env = Envelope::new(0.01, 10.0, 1.0)
            .with_interpolation(Interpolation::Exponential)
            .with_points([(0.0, 1.0), (1.0, 4.0)]);
        assert_relative_eq!(env.value_at(0.5), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_values_are_clamped() {
        let mut env = Envelope::default();
        let i = env.insert_or_replace(0.0, 5.0);
        assert_eq!(env.points()[i].value, 2.0);
    }

    #[test]
    fn test_insert_or_replace() {
        let mut env = ramp();
        assert_eq!(env.insert_or_replace(0.5, 0.2), 1);
        assert_eq!(env.len(), 3);
        assert_eq!(env.insert_or_replace(0.5, 0.7), 1);
        assert_eq!(env.len(), 3);
        assert_eq!(env.points()[1].value, 0.7);
    }

    #[test]
    fn test_move_point_bounded_by_neighbours() {
        let mut env = ramp().with_points([(2.0, 0.5)]);
        assert!(env.move_point(1, 5.0, 0.3));
        assert_eq!(env.points()[1].time, 2.0);
        assert!(env.move_point(1, -3.0, 0.3));
        assert_eq!(env.points()[1].time, 0.0);
        assert!(!env.move_point(7, 0.0, 0.0));
    }

    #[test]
    fn test_hidden_drag_point() {
        let mut env = ramp().with_points([(0.5, 2.0)]);
        env.set_drag_point(Some(1));
        assert!(env.is_drag_point_valid());
        assert_relative_eq!(env.value_at(0.5), 2.0);

        env.set_drag_point_valid(false);
        assert_relative_eq!(env.value_at(0.5), 0.5);

        env.clear_drag_point();
        assert_eq!(env.len(), 2);
        assert_eq!(env.drag_point(), None);
    }

    #[test]
    fn test_valid_drag_point_survives_clear() {
        let mut env = ramp();
        env.set_drag_point(Some(0));
        env.clear_drag_point();
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_delete_adjusts_drag_point() {
        let mut env = ramp().with_points([(2.0, 0.0)]);
        env.set_drag_point(Some(2));
        env.delete(0);
        assert_eq!(env.drag_point(), Some(1));
        env.delete(1);
        assert_eq!(env.drag_point(), None);
    }

    #[test]
    fn test_insert_space() {
        let mut env = ramp();
        env.insert_space(0.5, 2.0);
        assert_eq!(env.points()[0].time, 0.0);
        assert_eq!(env.points()[1].time, 3.0);
    }

    #[test]
    fn test_snapshot_drops_drag_state() {
        let mut env = ramp();
        env.set_drag_point(Some(1));
        let snap = env.snapshot();
        assert_eq!(snap.drag_point(), None);
        assert_eq!(snap.points(), env.points());
    }
}
