use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use nr_core::config::{NeonConfig, load_config};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::cli::ConfigOverrides;

/// Relit le fichier, applique les surcharges CLI et publie la nouvelle config.
///
/// En cas d'erreur, l'ancienne config reste en place.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn reload_config(
    path: &Path,
    config: &ArcSwap<NeonConfig>,
    overrides: &ConfigOverrides,
) -> Result<()> {
    let mut fresh = load_config(path)?;
    overrides.apply(&mut fresh);
    config.store(Arc::new(fresh));
    Ok(())
}

/// Lance un watcher qui surveille le fichier config et met à jour l'ArcSwap.
///
/// Retourne le Watcher (doit rester vivant tant que l'animation tourne).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use arc_swap::ArcSwap;
/// use nr_core::config::NeonConfig;
/// use nr_app::cli::ConfigOverrides;
/// use nr_app::hotreload::spawn_config_watcher;
/// use std::path::Path;
///
/// let config = Arc::new(ArcSwap::from_pointee(NeonConfig::default()));
/// let _watcher = spawn_config_watcher(
///     Path::new("config/default.toml"),
///     &config,
///     ConfigOverrides::default(),
/// );
/// ```
pub fn spawn_config_watcher(
    config_path: &Path,
    config: &Arc<ArcSwap<NeonConfig>>,
    overrides: ConfigOverrides,
) -> Result<impl Watcher + use<>> {
    let config = Arc::clone(config);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        {
            match reload_config(&path, &config, &overrides) {
                Ok(()) => log::info!("Config rechargée depuis {}", path.display()),
                Err(e) => log::warn!("Erreur de rechargement config : {e:#}"),
            }
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_applies_file_then_overrides() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("neon.toml");
        std::fs::write(&path, "[render]\npalette = \"amber\"\nspeed = 3.0\nfps = 30\n")?;

        let config = ArcSwap::from_pointee(NeonConfig::default());
        let overrides = ConfigOverrides {
            fps: Some(60),
            ..ConfigOverrides::default()
        };
        reload_config(&path, &config, &overrides)?;

        let current = config.load();
        assert_eq!(current.palette, "amber");
        assert!((current.speed - 3.0).abs() < f64::EPSILON);
        assert_eq!(current.fps, 60);
        Ok(())
    }

    #[test]
    fn broken_file_keeps_previous_config() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("neon.toml");
        std::fs::write(&path, "[render]\nunknown_key = 1\n")?;

        let config = ArcSwap::from_pointee(NeonConfig::default());
        let before = config.load_full();
        assert!(reload_config(&path, &config, &ConfigOverrides::default()).is_err());
        assert!(Arc::ptr_eq(&before, &config.load_full()));
        Ok(())
    }
}
