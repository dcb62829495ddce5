use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::path::Path;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::script::{parse_script, ParseDiagnostic};
use crate::store::SharedStore;
use crate::timecode::TimeCode;

// @module: Application controller for subtitle inspection

/// Main application controller driving parse, query, and batch checks
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Store the playback side would query
    store: SharedStore,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        Ok(Self {
            config,
            store: SharedStore::new(),
        })
    }

    /// The configuration this controller runs under
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse one script file, report its contents, and optionally query the
    /// entries active at a given timecode
    pub fn inspect<P: AsRef<Path>>(&self, script_path: P, at: Option<TimeCode>) -> Result<()> {
        let script_path = script_path.as_ref();
        if !FileManager::file_exists(script_path) {
            return Err(anyhow!("Script file does not exist: {:?}", script_path));
        }

        info!("Inspecting script: {:?}", script_path);

        let diagnostics = self.load_script(script_path)?;
        let snapshot = self.store.snapshot();

        info!(
            "Loaded {} entries over {} start time(s)",
            snapshot.len(),
            snapshot.start_times().count()
        );

        for diagnostic in &diagnostics {
            warn!("Skipped entry, {}", diagnostic);
        }

        for entry in snapshot.iter() {
            let styled = entry
                .style_ranges
                .iter()
                .filter(|range| !range.is_plain())
                .count();
            debug!(
                "{} --> {}: {:?} ({} styled range(s))",
                entry.start, entry.end, entry.text, styled
            );
        }

        if let Some(now) = at {
            let active = snapshot.active_entries(now);
            info!("{} entries active at {}", active.len(), now);
            for entry in active {
                println!("{}", entry);
            }
        }

        Ok(())
    }

    /// Parse every `.srt` file under a directory and report per-file counts.
    /// Returns the number of files that parsed without diagnostics.
    pub fn check_folder<P: AsRef<Path>>(&self, dir: P) -> Result<usize> {
        let dir = dir.as_ref();
        if !FileManager::dir_exists(dir) {
            return Err(anyhow!("Directory does not exist: {:?}", dir));
        }

        let files = FileManager::find_files(dir, "srt")?;
        if files.is_empty() {
            warn!("No subtitle scripts found in {:?}", dir);
            return Ok(0);
        }

        info!("Checking {} script(s) in {:?}", files.len(), dir);

        let mut clean = 0;
        for file in &files {
            match self.load_script(file) {
                Ok(diagnostics) if diagnostics.is_empty() => {
                    info!("{}: {} entries", file.display(), self.store.snapshot().len());
                    clean += 1;
                }
                Ok(diagnostics) => {
                    warn!(
                        "{}: {} entries, {} skipped",
                        file.display(),
                        self.store.snapshot().len(),
                        diagnostics.len()
                    );
                }
                Err(e) => {
                    error!("{}: {}", file.display(), e);
                }
            }
        }

        info!("{}/{} scripts parsed clean", clean, files.len());

        Ok(clean)
    }

    // Parse a script file under the configured policy and swap the result
    // into the shared store
    fn load_script(&self, path: &Path) -> Result<Vec<ParseDiagnostic>> {
        let content = FileManager::read_to_string(path)?;
        let document = parse_script(&content, self.config.parse_policy)
            .with_context(|| format!("Failed to parse script: {}", path.display()))?;

        let diagnostics = document.diagnostics;
        self.store.swap(document.store);

        Ok(diagnostics)
    }
}
