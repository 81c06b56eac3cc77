use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute, queue};
use nr_core::clock::AnimationClock;
use nr_core::config::NeonConfig;
use nr_render::pacer::FramePacer;
use nr_render::term::line_count;

use crate::scene::Scene;

/// Cache le curseur (et active le mode raw si demandé) ; restaure tout au drop,
/// y compris quand une erreur remonte.
pub struct TerminalGuard {
    raw: bool,
}

impl TerminalGuard {
    /// Prépare le terminal pour l'animation.
    ///
    /// # Errors
    /// Returns an error if raw mode cannot be enabled or the cursor cannot be hidden.
    pub fn enter(raw: bool) -> Result<Self> {
        if raw {
            terminal::enable_raw_mode().context("Impossible d'activer le mode raw")?;
        }
        let guard = Self { raw };
        execute!(io::stdout(), cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        execute!(out, cursor::Show).ok();
        if self.raw {
            terminal::disable_raw_mode().ok();
        }
        writeln!(out).ok();
        out.flush().ok();
    }
}

/// Remonte de `prev_lines` lignes et réécrit `output` par-dessus, suivi d'un
/// saut de ligne. En mode raw les `\n` deviennent `\r\n` et la fin de
/// chaque ligne est effacée.
///
/// Retourne le nombre de lignes de `output`, à passer au prochain appel.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn redraw(out: &mut impl Write, output: &str, prev_lines: u16, raw: bool) -> io::Result<u16> {
    if prev_lines > 0 {
        queue!(out, cursor::MoveUp(prev_lines))?;
    }
    if raw {
        for line in output.split('\n') {
            out.write_all(line.as_bytes())?;
            queue!(out, terminal::Clear(ClearType::UntilNewLine))?;
            out.write_all(b"\r\n")?;
        }
    } else {
        out.write_all(output.as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(line_count(output))
}

/// Boucle d'animation à cadence fixe jusqu'à Ctrl-C.
///
/// La config est relue à chaque tick : une nouvelle version publiée par le
/// hot-reload reconstruit la scène.
///
/// # Errors
/// Returns an error if the Ctrl-C handler cannot be installed or the terminal write fails.
pub fn run(mut scene: Scene, config: &Arc<ArcSwap<NeonConfig>>) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .context("Impossible d'installer le handler Ctrl-C")?;

    let mut applied = config.load_full();
    let mut pacer = FramePacer::new(applied.fps);
    let clock = AnimationClock::new();
    log::debug!(
        "Animation : {} ({}x{}), {} bits, {} fps",
        scene.spec(),
        scene.grid().width(),
        scene.grid().height(),
        scene.options().depth.bits(),
        applied.fps
    );

    let _guard = TerminalGuard::enter(false)?;
    let mut out = io::stdout().lock();
    let mut prev_lines = 0;

    while running.load(Ordering::SeqCst) {
        pacer.wait();

        let current = config.load_full();
        if !Arc::ptr_eq(&current, &applied) {
            scene.apply_config(&current);
            pacer.set_fps(current.fps);
            applied = current;
        }

        let frame = scene.frame(clock.elapsed_secs());
        prev_lines = redraw(&mut out, &frame, prev_lines, false)?;
    }
    log::debug!("Animation interrompue.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(output: &str, prev: u16, raw: bool) -> (String, u16) {
        let mut buf = Vec::new();
        let lines = match redraw(&mut buf, output, prev, raw) {
            Ok(lines) => lines,
            Err(e) => panic!("{e}"),
        };
        (String::from_utf8_lossy(&buf).into_owned(), lines)
    }

    #[test]
    fn first_frame_does_not_move_cursor() {
        let (text, lines) = written("\nA\nB", 0, false);
        assert_eq!(text, "\nA\nB\n");
        assert_eq!(lines, 3);
    }

    #[test]
    fn next_frames_move_up_by_previous_count() {
        let (text, _) = written("\nA", 3, false);
        assert_eq!(text, "\x1b[3A\nA\n");
    }

    #[test]
    fn raw_mode_uses_crlf_and_clears_line_ends() {
        let (text, lines) = written("help\n\nA", 2, true);
        assert_eq!(text, "\x1b[2Ahelp\x1b[K\r\n\x1b[K\r\nA\x1b[K\r\n");
        assert_eq!(lines, 3);
    }
}
