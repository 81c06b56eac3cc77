use std::time::{Duration, Instant};

/// Horloge d'animation : secondes écoulées depuis le démarrage, pauses exclues.
///
/// Seule source de continuité entre deux frames ; le rendu lui-même est sans état.
///
/// # Example
/// ```
/// use nr_core::clock::AnimationClock;
/// let mut clock = AnimationClock::new();
/// assert!(!clock.is_paused());
/// clock.toggle_pause();
/// assert!(clock.is_paused());
/// ```
#[derive(Clone, Debug)]
pub struct AnimationClock {
    origin: Instant,
    /// Instant de mise en pause, `None` si l'horloge tourne.
    paused_at: Option<Instant>,
    /// Temps cumulé passé en pause.
    paused_total: Duration,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock {
    /// Démarre une horloge maintenant.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Démarre une horloge à un instant donné.
    #[must_use]
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    /// Secondes d'animation écoulées à l'instant courant.
    #[inline]
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs_at(Instant::now())
    }

    /// Secondes d'animation écoulées à `now`. Gelé pendant une pause.
    #[must_use]
    pub fn elapsed_secs_at(&self, now: Instant) -> f64 {
        let now = self.paused_at.unwrap_or(now);
        now.saturating_duration_since(self.origin)
            .saturating_sub(self.paused_total)
            .as_secs_f64()
    }

    /// Met en pause ou relance l'horloge.
    pub fn toggle_pause(&mut self) {
        self.toggle_pause_at(Instant::now());
    }

    /// Met en pause ou relance l'horloge à `now`.
    pub fn toggle_pause_at(&mut self, now: Instant) {
        match self.paused_at.take() {
            Some(since) => self.paused_total += now.saturating_duration_since(since),
            None => self.paused_at = Some(now),
        }
    }

    /// `true` si l'horloge est en pause.
    #[inline]
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }
}
