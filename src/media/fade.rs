// fade.rs - Poster-to-media blend and texture upload pacing
//
// Both run on the wall clock handed in by the frame loop, in milliseconds.

/// Linear 0 -> 1 blend started once the primary media is ready.
#[derive(Clone, Copy, Debug)]
pub struct Crossfade {
    duration_ms: f64,
    started: Option<f64>,
    mix: f32,
}

impl Crossfade {
    pub fn new(duration_ms: f64) -> Self {
        Self { duration_ms, started: None, mix: 0.0 }
    }

    /// Start the blend. Later calls keep the original start so a second
    /// readiness signal never drops the plane back to its poster.
    pub fn begin(&mut self, now: f64) {
        if self.started.is_none() {
            self.started = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some() && self.mix < 1.0
    }

    pub fn advance(&mut self, now: f64) -> f32 {
        if let Some(start) = self.started {
            let t = if self.duration_ms > 0.0 { (now - start) / self.duration_ms } else { 1.0 };
            self.mix = t.clamp(0.0, 1.0) as f32;
        }
        self.mix
    }

    /// 0 shows the poster, 1 the media
    pub fn mix(&self) -> f32 {
        self.mix
    }
}

/// Caps re-uploads of a playing video when the platform can't tell us
/// about individual decoded frames.
#[derive(Clone, Copy, Debug)]
pub struct UploadThrottle {
    interval_ms: f64,
    last: f64,
}

/// Roughly 30 uploads per second
pub const UPLOAD_INTERVAL_MS: f64 = 33.0;

impl Default for UploadThrottle {
    fn default() -> Self {
        Self::new(UPLOAD_INTERVAL_MS)
    }
}

impl UploadThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self { interval_ms, last: f64::NEG_INFINITY }
    }

    pub fn ready(&mut self, now: f64) -> bool {
        if now - self.last > self.interval_ms {
            self.last = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_rises_over_the_window_then_holds() {
        let mut f = Crossfade::new(250.0);
        assert_eq!(f.advance(10.0), 0.0);
        assert!(!f.is_running());

        f.begin(1000.0);
        assert!(f.is_running());
        assert_eq!(f.advance(1000.0), 0.0);

        let mut prev = 0.0;
        for ms in (10..250).step_by(10) {
            let m = f.advance(1000.0 + ms as f64);
            assert!(m > prev && m < 1.0, "at {ms}ms mix={m}");
            prev = m;
        }
        assert_eq!(f.advance(1250.0), 1.0);
        assert!(!f.is_running());
        assert_eq!(f.advance(9000.0), 1.0);
    }

    #[test]
    fn second_begin_keeps_first_start() {
        let mut f = Crossfade::new(100.0);
        f.begin(0.0);
        f.advance(80.0);
        f.begin(80.0);
        assert_eq!(f.advance(100.0), 1.0);
    }

    #[test]
    fn zero_duration_is_immediate() {
        let mut f = Crossfade::new(0.0);
        f.begin(5.0);
        assert_eq!(f.advance(5.0), 1.0);
    }

    #[test]
    fn throttle_spaces_uploads() {
        let mut t = UploadThrottle::default();
        assert!(t.ready(0.0));
        assert!(!t.ready(20.0));
        assert!(!t.ready(33.0));
        assert!(t.ready(34.0));
        assert!(!t.ready(50.0));
        assert!(t.ready(100.0));
    }
}
