use std::time::{Duration, Instant};

/// Cadenceur de frames à période fixe.
///
/// Chaque tick produit une frame complète ; une frame en retard part
/// immédiatement, sans rafale de rattrapage ni tick sauté.
///
/// # Example
/// ```
/// use nr_render::pacer::FramePacer;
/// let pacer = FramePacer::new(24);
/// assert_eq!(pacer.period().as_millis(), 41);
/// ```
pub struct FramePacer {
    period: Duration,
    /// Échéance de la prochaine frame.
    deadline: Instant,
}

impl FramePacer {
    /// Cadenceur à `fps` images par seconde (au moins 1).
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self::starting_at(fps, Instant::now())
    }

    /// Cadenceur dont la première échéance est `start`.
    #[must_use]
    pub fn starting_at(fps: u32, start: Instant) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            deadline: start,
        }
    }

    /// Période entre deux frames.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Change la cadence ; prend effet à la prochaine échéance.
    pub fn set_fps(&mut self, fps: u32) {
        self.period = Duration::from_secs(1) / fps.max(1);
    }

    /// Attente avant l'échéance courante, puis avance l'échéance d'une période.
    ///
    /// Si `now` a dépassé l'échéance, l'attente est nulle et la prochaine
    /// échéance repart de `now`.
    pub fn advance(&mut self, now: Instant) -> Duration {
        let wait = self.deadline.saturating_duration_since(now);
        let base = if self.deadline < now { now } else { self.deadline };
        self.deadline = base + self.period;
        wait
    }

    /// Bloque jusqu'à l'échéance de la prochaine frame.
    pub fn wait(&mut self) {
        let wait = self.advance(Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_ticks_are_one_period_apart() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::starting_at(10, t0);
        assert_eq!(pacer.advance(t0), Duration::ZERO);
        assert_eq!(
            pacer.advance(t0 + Duration::from_millis(30)),
            Duration::from_millis(70)
        );
        assert_eq!(
            pacer.advance(t0 + Duration::from_millis(100)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn late_frame_runs_now_without_burst() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::starting_at(10, t0);
        pacer.advance(t0);
        let late = t0 + Duration::from_millis(450);
        assert_eq!(pacer.advance(late), Duration::ZERO);
        assert_eq!(
            pacer.advance(late + Duration::from_millis(20)),
            Duration::from_millis(80)
        );
    }

    #[test]
    fn zero_fps_is_clamped() {
        let mut pacer = FramePacer::new(0);
        assert_eq!(pacer.period(), Duration::from_secs(1));
        pacer.set_fps(50);
        assert_eq!(pacer.period(), Duration::from_millis(20));
    }
}
