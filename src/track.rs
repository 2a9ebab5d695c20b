use crate::{
    core::{FrameIndex, Point},
    ease::Ease,
    error::{SwapmotionError, SwapmotionResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    pub frame: FrameIndex,
    pub value: T,
    pub ease: Ease, // ease applied toward the next key
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub enum InterpMode {
    Hold,
    Linear,
}

/// A keyframed property of one visual object. Keys are appended in frame
/// order while the stage compiler replays the timeline and stay sorted.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Track<T> {
    pub keys: Vec<Keyframe<T>>, // sorted by frame
    pub mode: InterpMode,
}

impl<T> Track<T>
where
    T: Lerp + Clone,
{
    pub fn constant(frame: FrameIndex, value: T) -> Self {
        Self {
            keys: vec![Keyframe {
                frame,
                value,
                ease: Ease::Linear,
            }],
            mode: InterpMode::Linear,
        }
    }

    pub fn validate(&self) -> SwapmotionResult<()> {
        if self.keys.is_empty() {
            return Err(SwapmotionError::validation(
                "Track must have at least one key",
            ));
        }
        if !self.keys.windows(2).all(|w| w[0].frame.0 <= w[1].frame.0) {
            return Err(SwapmotionError::validation("Track keys must be sorted"));
        }
        Ok(())
    }

    /// Append a key at `frame`. A key on the same frame as the current last
    /// key is a jump discontinuity: sampling at that frame sees the later
    /// value. An earlier frame is a sequencing bug and is rejected.
    pub fn push_key(&mut self, frame: FrameIndex, value: T, ease: Ease) -> SwapmotionResult<()> {
        if let Some(last) = self.keys.last()
            && frame.0 < last.frame.0
        {
            return Err(SwapmotionError::validation(
                "Track keys must be appended in frame order",
            ));
        }
        self.keys.push(Keyframe { frame, value, ease });
        Ok(())
    }

    pub fn last_value(&self) -> SwapmotionResult<T> {
        self.keys
            .last()
            .map(|k| k.value.clone())
            .ok_or_else(|| SwapmotionError::validation("Track has no keys"))
    }

    pub fn sample(&self, frame: FrameIndex) -> SwapmotionResult<T> {
        if self.keys.is_empty() {
            return Err(SwapmotionError::validation("Track has no keys"));
        }

        let f = frame.0;
        let idx = self.keys.partition_point(|k| k.frame.0 <= f);

        if idx == 0 {
            return Ok(self.keys[0].value.clone());
        }
        if idx >= self.keys.len() {
            return Ok(self.keys[self.keys.len() - 1].value.clone());
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let denom = b.frame.0.saturating_sub(a.frame.0);
        if denom == 0 {
            return Ok(a.value.clone());
        }

        let t = ((f - a.frame.0) as f64) / (denom as f64);
        let te = a.ease.apply(t);
        match self.mode {
            InterpMode::Hold => Ok(a.value.clone()),
            InterpMode::Linear => Ok(T::lerp(&a.value, &b.value, te)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_clamps_outside_key_span() {
        let mut t = Track::constant(FrameIndex(10), 1.0);
        t.push_key(FrameIndex(20), 3.0, Ease::Linear).unwrap();
        assert_eq!(t.sample(FrameIndex(0)).unwrap(), 1.0);
        assert_eq!(t.sample(FrameIndex(99)).unwrap(), 3.0);
    }

    #[test]
    fn linear_interpolates_between_keys() {
        let mut t = Track::constant(FrameIndex(0), 0.0);
        t.push_key(FrameIndex(10), 10.0, Ease::Linear).unwrap();
        assert_eq!(t.sample(FrameIndex(5)).unwrap(), 5.0);
    }

    #[test]
    fn per_key_ease_shapes_the_segment() {
        let mut t = Track {
            keys: vec![Keyframe {
                frame: FrameIndex(0),
                value: 0.0,
                ease: Ease::Smooth,
            }],
            mode: InterpMode::Linear,
        };
        t.push_key(FrameIndex(10), 1.0, Ease::Linear).unwrap();
        assert_eq!(t.sample(FrameIndex(5)).unwrap(), 0.5);
        assert!(t.sample(FrameIndex(2)).unwrap() < 0.2);
        assert!(t.sample(FrameIndex(8)).unwrap() > 0.8);
    }

    #[test]
    fn same_frame_key_is_a_jump() {
        let mut t = Track::constant(FrameIndex(0), 0.0);
        t.push_key(FrameIndex(0), 1.0, Ease::Linear).unwrap();
        assert_eq!(t.keys.len(), 2);
        assert_eq!(t.sample(FrameIndex(0)).unwrap(), 1.0);
    }

    #[test]
    fn jump_mid_track_holds_the_earlier_span() {
        let mut t = Track::constant(FrameIndex(0), 0.0);
        t.push_key(FrameIndex(30), 0.0, Ease::Linear).unwrap();
        t.push_key(FrameIndex(30), 1.0, Ease::Linear).unwrap();
        assert_eq!(t.sample(FrameIndex(15)).unwrap(), 0.0);
        assert_eq!(t.sample(FrameIndex(29)).unwrap(), 0.0);
        assert_eq!(t.sample(FrameIndex(30)).unwrap(), 1.0);
    }

    #[test]
    fn out_of_order_key_is_rejected() {
        let mut t = Track::constant(FrameIndex(10), 0.0);
        assert!(t.push_key(FrameIndex(5), 1.0, Ease::Linear).is_err());
    }

    #[test]
    fn point_lerp_moves_both_axes() {
        let p = Point::lerp(Point::new(0.0, 10.0), Point::new(10.0, 0.0), 0.5);
        assert_eq!(p, Point::new(5.0, 5.0));
    }
}
