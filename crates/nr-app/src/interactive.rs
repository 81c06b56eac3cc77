use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal;
use nr_core::clock::AnimationClock;
use nr_core::color::ColorDepth;
use nr_core::config::NeonConfig;
use nr_render::pacer::FramePacer;

use crate::animate::{TerminalGuard, redraw};
use crate::scene::Scene;
use crate::session::{Action, HELP_WIDTH, Session, Step, fit_width};

/// Intervalle de polling du thread clavier.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Thread de lecture clavier ; s'arrête quand la valeur est droppée.
struct KeyReader {
    rx: flume::Receiver<KeyEvent>,
    running: Arc<AtomicBool>,
}

impl KeyReader {
    fn spawn() -> Result<Self> {
        let (tx, rx) = flume::unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let alive = Arc::clone(&running);

        std::thread::Builder::new()
            .name("key_reader".into())
            .spawn(move || {
                while alive.load(Ordering::Relaxed) {
                    match event::poll(POLL_INTERVAL) {
                        Ok(false) => {}
                        Ok(true) => match event::read() {
                            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                                if tx.send(key).is_err() {
                                    break;
                                }
                            }
                            Ok(_) => {}
                            Err(e) => {
                                log::warn!("Lecture clavier impossible : {e}");
                                break;
                            }
                        },
                        Err(e) => {
                            log::warn!("Lecture clavier impossible : {e}");
                            break;
                        }
                    }
                }
            })
            .context("Impossible de lancer le thread clavier")?;

        Ok(Self { rx, running })
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

/// Aligne la scène sur la palette et l'effet de la session.
fn sync_scene(scene: &mut Scene, session: &Session) {
    scene.set_palette(session.palette_name());
    scene.set_effect(session.effect_spec(), session.speed(), session.intensity());
}

/// Mode interactif : lignes d'aide + bannière animée, pilotées au clavier.
///
/// # Errors
/// Returns an error if the terminal cannot be set up or written to.
pub fn run(
    text: &str,
    config: &Arc<ArcSwap<NeonConfig>>,
    probed_depth: ColorDepth,
) -> Result<()> {
    let mut applied = config.load_full();
    let mut session = Session::new(&applied);
    let mut scene = Scene::new(text, &applied, probed_depth);
    sync_scene(&mut scene, &session);

    let mut pacer = FramePacer::new(applied.fps);
    let mut clock = AnimationClock::new();

    let _guard = TerminalGuard::enter(true)?;
    let keys = KeyReader::spawn()?;
    let mut out = io::stdout().lock();
    let mut prev_lines = 0;

    'frames: loop {
        pacer.wait();

        for key in keys.rx.try_iter() {
            let Some(action) = Action::from_key(key.code, key.modifiers) else {
                continue;
            };
            match session.apply(action) {
                Step::Quit => break 'frames,
                Step::Palette => scene.set_palette(session.palette_name()),
                Step::Effect => {
                    scene.set_effect(session.effect_spec(), session.speed(), session.intensity());
                }
                Step::Pause => {
                    if clock.is_paused() != session.is_paused() {
                        clock.toggle_pause();
                    }
                }
                Step::Unchanged => {}
            }
        }

        let current = config.load_full();
        if !Arc::ptr_eq(&current, &applied) {
            session.reload(&current);
            scene.apply_config(&current);
            sync_scene(&mut scene, &session);
            pacer.set_fps(current.fps);
            applied = current;
        }

        let columns = terminal::size().map_or(HELP_WIDTH, |(w, _)| usize::from(w));
        let [status, controls] = session.help_lines();
        let output = format!(
            "{}\n{}\n{}",
            fit_width(&status, columns),
            fit_width(&controls, columns),
            scene.frame(clock.elapsed_secs())
        );
        prev_lines = redraw(&mut out, &output, prev_lines, true)?;
    }
    Ok(())
}
