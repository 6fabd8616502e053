//! Wave clips
//!
//! A clip is a run of samples placed at an offset on the timeline, with its
//! own gain envelope and any cut lines left behind by cut operations.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::Envelope;

/// Marker left where audio was cut; keeps the removed samples so the cut
/// can be expanded again
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutLine {
    /// Seconds from the clip start
    pub time: f64,
    pub hidden: Vec<f32>,
}

/// Samples + envelope at a position on the timeline
#[derive(Debug, Clone)]
pub struct WaveClip {
    offset: f64,
    rate: f64,
    samples: Vec<f32>,
    envelope: Arc<RwLock<Envelope>>,
    cut_lines: Vec<CutLine>,
}

/// Plain-data copy of a clip for undo history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipState {
    pub offset: f64,
    pub samples: Vec<f32>,
    pub envelope_points: Vec<(f64, f64)>,
    pub cut_lines: Vec<CutLine>,
}

impl WaveClip {
    pub fn new(offset: f64, rate: f64, samples: Vec<f32>) -> Self {
        let mut envelope = Envelope::default();
        envelope.set_offset(offset);
        Self {
            offset,
            rate,
            samples,
            envelope: Arc::new(RwLock::new(envelope)),
            cut_lines: Vec::new(),
        }
    }

    /// Silent clip of the given length
    pub fn silence(offset: f64, rate: f64, seconds: f64) -> Self {
        let len = (seconds * rate).round().max(0.0) as usize;
        Self::new(offset, rate, vec![0.0; len])
    }

    pub fn with_cut_line(mut self, time: f64, hidden: Vec<f32>) -> Self {
        self.add_cut_line(time, hidden);
        self
    }

    pub fn with_envelope_points(self, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        {
            let mut env = self.envelope.write();
            for (time, value) in points {
                env.insert_or_replace(time, value);
            }
        }
        self
    }

    pub fn start(&self) -> f64 {
        self.offset
    }

    pub fn end(&self) -> f64 {
        self.offset + self.samples.len() as f64 / self.rate
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn contains_time(&self, time: f64) -> bool {
        time >= self.start() && time < self.end()
    }

    /// Move the clip (and its envelope) to a new start time
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.envelope.write().set_offset(offset);
    }

    pub fn shift(&mut self, delta: f64) {
        self.set_offset(self.offset + delta);
    }

    pub fn envelope(&self) -> &Arc<RwLock<Envelope>> {
        &self.envelope
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Index of the sample nearest an absolute time
    pub fn sample_index_at(&self, time: f64) -> Option<usize> {
        if !self.contains_time(time) {
            return None;
        }
        let idx = ((time - self.offset) * self.rate).round() as usize;
        Some(idx.min(self.samples.len().saturating_sub(1)))
    }

    pub fn sample_at(&self, time: f64) -> Option<f32> {
        self.sample_index_at(time).map(|i| self.samples[i])
    }

    pub fn set_sample(&mut self, index: usize, value: f32) -> bool {
        match self.samples.get_mut(index) {
            Some(s) => {
                *s = value;
                true
            }
            None => false,
        }
    }

    pub fn cut_lines(&self) -> &[CutLine] {
        &self.cut_lines
    }

    pub fn add_cut_line(&mut self, time: f64, hidden: Vec<f32>) {
        let idx = self.cut_lines.partition_point(|c| c.time <= time);
        self.cut_lines.insert(idx, CutLine { time, hidden });
    }

    /// Absolute time of a cut line
    pub fn cut_line_time(&self, index: usize) -> Option<f64> {
        self.cut_lines.get(index).map(|c| self.offset + c.time)
    }

    /// Put the hidden samples of a cut line back into the clip
    pub fn expand_cut_line(&mut self, index: usize) -> bool {
        if index >= self.cut_lines.len() {
            return false;
        }
        let cut = self.cut_lines.remove(index);
        let at = ((cut.time * self.rate).round() as usize).min(self.samples.len());
        let len = cut.hidden.len();
        self.samples.splice(at..at, cut.hidden);

        let seconds = len as f64 / self.rate;
        for later in self.cut_lines.iter_mut().filter(|c| c.time > cut.time) {
            later.time += seconds;
        }
        self.envelope.write().insert_space(cut.time, seconds);
        true
    }

    /// Drop a cut line, discarding its hidden samples
    pub fn remove_cut_line(&mut self, index: usize) -> bool {
        if index >= self.cut_lines.len() {
            return false;
        }
        self.cut_lines.remove(index);
        true
    }

    pub fn state(&self) -> ClipState {
        let env = self.envelope.read().snapshot();
        ClipState {
            offset: self.offset,
            samples: self.samples.clone(),
            envelope_points: env.points().iter().map(|p| (p.time, p.value)).collect(),
            cut_lines: self.cut_lines.clone(),
        }
    }

    /// Restore from history, keeping the shared envelope allocation
    pub fn restore(&mut self, state: &ClipState) {
        self.samples = state.samples.clone();
        self.cut_lines = state.cut_lines.clone();
        self.offset = state.offset;

        let mut env = self.envelope.write();
        let restored = Envelope::new(env.min_value(), env.max_value(), env.default_value())
            .with_points(state.envelope_points.iter().copied());
        *env = restored;
        env.set_offset(state.offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_and_lookup() {
        let clip = WaveClip::new(1.0, 10.0, vec![0.0, 0.1, 0.2, 0.3]);
        assert_relative_eq!(clip.end(), 1.4);
        assert!(clip.contains_time(1.0));
        assert!(!clip.contains_time(1.4));
        assert_eq!(clip.sample_index_at(1.2), Some(2));
        assert_eq!(clip.sample_at(1.3), Some(0.3));
        assert_eq!(clip.sample_at(0.5), None);
    }

    #[test]
    fn test_shift_moves_envelope() {
        let mut clip = WaveClip::silence(0.0, 10.0, 1.0).with_envelope_points([(0.0, 0.0), (1.0, 1.0)]);
        clip.shift(2.0);
        assert_relative_eq!(clip.start(), 2.0);
        assert_relative_eq!(clip.envelope().read().value_at(2.5), 0.5);
    }

    #[test]
    fn test_expand_cut_line() {
        let mut clip = WaveClip::new(0.0, 10.0, vec![1.0, 2.0, 3.0, 4.0])
            .with_cut_line(0.2, vec![9.0, 9.0])
            .with_cut_line(0.3, vec![8.0]);
        assert!(clip.expand_cut_line(0));
        assert_eq!(clip.samples(), &[1.0, 2.0, 9.0, 9.0, 3.0, 4.0]);
        assert_eq!(clip.cut_lines().len(), 1);
        assert_relative_eq!(clip.cut_lines()[0].time, 0.5);
        assert!(!clip.expand_cut_line(3));
    }

    #[test]
    fn test_remove_cut_line() {
        let mut clip = WaveClip::silence(0.0, 10.0, 1.0).with_cut_line(0.5, vec![1.0]);
        assert!(clip.remove_cut_line(0));
        assert!(clip.cut_lines().is_empty());
        assert_eq!(clip.samples().len(), 10);
    }

    #[test]
    fn test_state_restore_keeps_envelope_identity() {
        let mut clip = WaveClip::silence(0.0, 10.0, 1.0).with_envelope_points([(0.5, 0.5)]);
        let env = Arc::clone(clip.envelope());
        let saved = clip.state();

        clip.envelope().write().insert_or_replace(0.7, 2.0);
        clip.set_sample(3, 0.9);
        clip.shift(1.0);

        clip.restore(&saved);
        assert!(Arc::ptr_eq(&env, clip.envelope()));
        assert_eq!(env.read().len(), 1);
        assert_eq!(clip.samples()[3], 0.0);
        assert_relative_eq!(clip.start(), 0.0);
        assert_relative_eq!(env.read().offset(), 0.0);
    }
}
