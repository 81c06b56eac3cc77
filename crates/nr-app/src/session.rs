use crossterm::event::{KeyCode, KeyModifiers};
use nr_core::config::NeonConfig;
use nr_core::palette::{list_palettes, palette_index};
use nr_render::compose::EffectSpec;
use nr_render::effects::{EFFECT_KINDS, EffectKind};

/// Pas d'ajustement de la vitesse.
pub const SPEED_STEP: f64 = 0.25;
/// Pas d'ajustement de l'intensité.
pub const INTENSITY_STEP: f64 = 0.1;
/// Largeur maximale des lignes d'aide.
pub const HELP_WIDTH: usize = 80;

/// Commande du mode interactif.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    PrevPalette,
    NextPalette,
    NextEffect,
    PrevEffect,
    ToggleFlicker,
    SpeedUp,
    SpeedDown,
    IntensityUp,
    IntensityDown,
    TogglePause,
    Quit,
}

impl Action {
    /// Commande associée à une touche, `None` si la touche est ignorée.
    #[must_use]
    pub fn from_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Self> {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return matches!(code, KeyCode::Char('c' | 'C')).then_some(Self::Quit);
        }
        let action = match code {
            KeyCode::Left => Self::PrevPalette,
            KeyCode::Right => Self::NextPalette,
            KeyCode::Up => Self::NextEffect,
            KeyCode::Down => Self::PrevEffect,
            KeyCode::Char('f' | 'F') => Self::ToggleFlicker,
            KeyCode::Char('+' | '=') => Self::SpeedUp,
            KeyCode::Char('-' | '_') => Self::SpeedDown,
            KeyCode::Char(']') => Self::IntensityUp,
            KeyCode::Char('[') => Self::IntensityDown,
            KeyCode::Char(' ') => Self::TogglePause,
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(action)
    }
}

/// Ce que le driver doit reconstruire après une commande.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Rien n'a changé.
    Unchanged,
    /// Nouvelle palette : reconstruire le dégradé.
    Palette,
    /// Effet, vitesse ou intensité modifiés : reconstruire l'effet composé.
    Effect,
    /// Basculer la pause de l'horloge.
    Pause,
    /// Quitter.
    Quit,
}

/// État du mode interactif : palette et effet courants, overlay flicker,
/// vitesse, intensité, pause.
///
/// Aucune E/S : [`Session::apply`] est une transition pure.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    palettes: Vec<&'static str>,
    palette_index: usize,
    effect_index: usize,
    flicker: bool,
    speed: f64,
    intensity: f64,
    paused: bool,
}

impl Session {
    /// Session initialisée depuis la config. Un effet combiné démarre sur
    /// son premier composant.
    #[must_use]
    pub fn new(config: &NeonConfig) -> Self {
        let first = EffectSpec::parse(&config.effect).kinds()[0];
        Self {
            palettes: list_palettes(),
            palette_index: palette_index(&config.palette),
            effect_index: EFFECT_KINDS.iter().position(|k| *k == first).unwrap_or(0),
            flicker: false,
            speed: config.speed,
            intensity: config.intensity,
            paused: false,
        }
    }

    /// Reprend palette, effet, vitesse et intensité d'une config rechargée ;
    /// l'overlay flicker et la pause sont conservés.
    pub fn reload(&mut self, config: &NeonConfig) {
        let fresh = Self::new(config);
        *self = Self {
            flicker: self.flicker,
            paused: self.paused,
            ..fresh
        };
    }

    /// Palette courante.
    #[must_use]
    pub fn palette_name(&self) -> &'static str {
        self.palettes
            .get(self.palette_index)
            .copied()
            .unwrap_or(nr_core::palette::DEFAULT_PALETTE)
    }

    /// Effet de base courant.
    #[must_use]
    pub fn effect(&self) -> EffectKind {
        EFFECT_KINDS[self.effect_index % EFFECT_KINDS.len()]
    }

    /// Spécification d'effets courante (effet de base + flicker éventuel).
    #[must_use]
    pub fn effect_spec(&self) -> EffectSpec {
        let mut names = vec![self.effect().name()];
        if self.flicker {
            names.push(EffectKind::Flicker.name());
        }
        EffectSpec::from_names(names)
    }

    /// Vitesse courante.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Intensité courante.
    #[must_use]
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// `true` si l'animation est en pause.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Applique une commande et indique quoi reconstruire.
    pub fn apply(&mut self, action: Action) -> Step {
        let palettes = self.palettes.len().max(1);
        let effects = EFFECT_KINDS.len();
        match action {
            Action::PrevPalette => {
                self.palette_index = (self.palette_index + palettes - 1) % palettes;
                Step::Palette
            }
            Action::NextPalette => {
                self.palette_index = (self.palette_index + 1) % palettes;
                Step::Palette
            }
            Action::NextEffect => {
                self.effect_index = (self.effect_index + 1) % effects;
                Step::Effect
            }
            Action::PrevEffect => {
                self.effect_index = (self.effect_index + effects - 1) % effects;
                Step::Effect
            }
            Action::ToggleFlicker => {
                self.flicker = !self.flicker;
                Step::Effect
            }
            Action::SpeedUp => self.set_speed(self.speed + SPEED_STEP),
            Action::SpeedDown => self.set_speed(self.speed - SPEED_STEP),
            Action::IntensityUp => self.set_intensity(self.intensity + INTENSITY_STEP),
            Action::IntensityDown => self.set_intensity(self.intensity - INTENSITY_STEP),
            Action::TogglePause => {
                self.paused = !self.paused;
                Step::Pause
            }
            Action::Quit => Step::Quit,
        }
    }

    fn set_speed(&mut self, speed: f64) -> Step {
        let speed = speed.clamp(0.0, 10.0);
        if (speed - self.speed).abs() < f64::EPSILON {
            return Step::Unchanged;
        }
        self.speed = speed;
        Step::Effect
    }

    fn set_intensity(&mut self, intensity: f64) -> Step {
        // arrondi au pas pour éviter la dérive flottante (0.1 * 3 != 0.3)
        let intensity = ((intensity / INTENSITY_STEP).round() * INTENSITY_STEP).clamp(0.0, 1.0);
        if (intensity - self.intensity).abs() < f64::EPSILON {
            return Step::Unchanged;
        }
        self.intensity = intensity;
        Step::Effect
    }

    /// Lignes d'aide affichées au-dessus de la bannière : état courant,
    /// puis réglages. Chacune tient dans [`HELP_WIDTH`] colonnes.
    #[must_use]
    pub fn help_lines(&self) -> [String; 2] {
        [
            format!(
                "←/→ palette: {}  ↑/↓ effect: {}{}",
                self.palette_name(),
                self.effect().name(),
                if self.flicker { "+flicker" } else { "" },
            ),
            format!(
                "f: flicker  +/- speed: {:.2}  [/] intensity: {:.1}  space: {}  q: quit",
                self.speed,
                self.intensity,
                if self.paused { "resume" } else { "pause" },
            ),
        ]
    }
}

/// Coupe `line` à `columns` caractères, pour qu'elle ne passe jamais à la
/// ligne dans le terminal.
#[must_use]
pub fn fit_width(line: &str, columns: usize) -> &str {
    match line.char_indices().nth(columns) {
        Some((end, _)) => &line[..end],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&NeonConfig::default())
    }

    #[test]
    fn starts_from_config() {
        let config = NeonConfig {
            palette: "cyberpunk".to_string(),
            effect: "pulse+sparkle".to_string(),
            ..NeonConfig::default()
        };
        let s = Session::new(&config);
        assert_eq!(s.palette_name(), "cyberpunk-pinkblue");
        assert_eq!(s.effect(), EffectKind::Pulse);
        assert_eq!(s.effect_spec().names(), ["pulse"]);

        let unknown = Session::new(&NeonConfig {
            palette: "nope".to_string(),
            effect: "laser".to_string(),
            ..NeonConfig::default()
        });
        assert_eq!(unknown.palette_name(), list_palettes()[0]);
        assert_eq!(unknown.effect(), EffectKind::Shimmer);
    }

    #[test]
    fn palettes_wrap_both_ways() {
        let mut s = session();
        let names = list_palettes();
        assert_eq!(s.apply(Action::PrevPalette), Step::Palette);
        assert_eq!(s.palette_name(), names[names.len() - 1]);
        assert_eq!(s.apply(Action::NextPalette), Step::Palette);
        assert_eq!(s.palette_name(), names[0]);
    }

    #[test]
    fn effects_cycle_up_forward_down_backward() {
        let mut s = session();
        assert_eq!(s.apply(Action::NextEffect), Step::Effect);
        assert_eq!(s.effect(), EFFECT_KINDS[1]);
        s.apply(Action::PrevEffect);
        s.apply(Action::PrevEffect);
        assert_eq!(s.effect(), EFFECT_KINDS[EFFECT_KINDS.len() - 1]);
    }

    #[test]
    fn flicker_overlay() {
        let mut s = session();
        assert_eq!(s.apply(Action::ToggleFlicker), Step::Effect);
        assert_eq!(s.effect_spec().to_string(), "shimmer+flicker");
        assert!(s.help_lines()[0].ends_with("effect: shimmer+flicker"));
        s.apply(Action::ToggleFlicker);
        assert_eq!(s.effect_spec().to_string(), "shimmer");
    }

    #[test]
    fn speed_and_intensity_are_clamped() {
        let mut s = session();
        assert_eq!(s.apply(Action::IntensityUp), Step::Unchanged);
        assert_eq!(s.apply(Action::IntensityDown), Step::Effect);
        assert!((s.intensity() - 0.9).abs() < 1e-9);
        for _ in 0..20 {
            s.apply(Action::IntensityDown);
        }
        assert!(s.intensity().abs() < f64::EPSILON);

        assert_eq!(s.apply(Action::SpeedUp), Step::Effect);
        assert!((s.speed() - 1.25).abs() < f64::EPSILON);
        for _ in 0..10 {
            s.apply(Action::SpeedDown);
        }
        assert!(s.speed().abs() < f64::EPSILON);
        assert_eq!(s.apply(Action::SpeedDown), Step::Unchanged);
    }

    #[test]
    fn reload_keeps_overlay_and_pause() {
        let mut s = session();
        s.apply(Action::ToggleFlicker);
        s.apply(Action::TogglePause);
        s.reload(&NeonConfig {
            palette: "amber".to_string(),
            effect: "comet".to_string(),
            speed: 3.0,
            ..NeonConfig::default()
        });
        assert_eq!(s.palette_name(), "neon-amber");
        assert_eq!(s.effect_spec().to_string(), "comet+flicker");
        assert!(s.is_paused());
        assert!((s.speed() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pause_and_quit() {
        let mut s = session();
        assert_eq!(s.apply(Action::TogglePause), Step::Pause);
        assert!(s.is_paused());
        assert!(s.help_lines()[1].contains("space: resume"));
        assert_eq!(s.apply(Action::Quit), Step::Quit);
    }

    #[test]
    fn key_bindings() {
        let none = KeyModifiers::NONE;
        assert_eq!(Action::from_key(KeyCode::Left, none), Some(Action::PrevPalette));
        assert_eq!(Action::from_key(KeyCode::Up, none), Some(Action::NextEffect));
        assert_eq!(Action::from_key(KeyCode::Char('Q'), none), Some(Action::Quit));
        assert_eq!(
            Action::from_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
        assert_eq!(Action::from_key(KeyCode::Char('f'), KeyModifiers::CONTROL), None);
        assert_eq!(Action::from_key(KeyCode::Char('['), none), Some(Action::IntensityDown));
        assert_eq!(Action::from_key(KeyCode::Char('x'), none), None);
    }

    #[test]
    fn help_lines_format() {
        let [status, keys] = session().help_lines();
        assert_eq!(status, "←/→ palette: neon-violet  ↑/↓ effect: shimmer");
        assert_eq!(
            keys,
            "f: flicker  +/- speed: 1.00  [/] intensity: 1.0  space: pause  q: quit"
        );
    }

    #[test]
    fn help_lines_fit_in_80_columns() {
        let mut s = Session::new(&NeonConfig {
            palette: "cyberpunk".to_string(),
            effect: "scanline".to_string(),
            speed: 10.0,
            ..NeonConfig::default()
        });
        s.apply(Action::ToggleFlicker);
        s.apply(Action::TogglePause);
        for _ in 0..EFFECT_KINDS.len() {
            for line in s.help_lines() {
                assert!(line.chars().count() <= HELP_WIDTH, "{line}");
            }
            s.apply(Action::NextEffect);
        }
    }

    #[test]
    fn fit_width_cuts_on_char_boundaries() {
        assert_eq!(fit_width("←/→ palette", 3), "←/→");
        assert_eq!(fit_width("short", 80), "short");
        assert_eq!(fit_width("abc", 0), "");
    }
}
