pub mod state;
pub mod storage;

use crate::config::CheckpointConfig;
use state::SimulationSnapshot;
use std::fs;
use std::path::Path;

pub fn save_checkpoint(
    snapshot: &SimulationSnapshot,
    config: &CheckpointConfig,
    session: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let dir = Path::new(&config.directory);
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let checkpoint_path = storage::create_checkpoint_path(&config.directory, session);
    let json = snapshot.to_json()?;
    fs::write(&checkpoint_path, json)?;

    storage::cleanup_old_checkpoints(&config.directory, session, config.keep_last_n)?;

    Ok(checkpoint_path.to_string_lossy().to_string())
}

pub fn load_checkpoint(
    config: &CheckpointConfig,
    session: &str,
) -> Result<Option<SimulationSnapshot>, Box<dyn std::error::Error>> {
    if let Some(checkpoint_path) = storage::find_latest_checkpoint(&config.directory, session) {
        log::info!("Loading checkpoint from: {:?}", checkpoint_path);

        match fs::read_to_string(&checkpoint_path) {
            Ok(content) => match SimulationSnapshot::from_json(&content) {
                Ok(snapshot) => Ok(Some(snapshot)),
                Err(e) => {
                    // Keep the unreadable file around under a new name and start fresh.
                    log::error!("Failed to parse checkpoint file: {}. Creating backup and starting fresh.", e);

                    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
                    let backup_path = format!("{}.backup.{}", checkpoint_path.display(), timestamp);

                    if let Err(rename_err) = fs::rename(&checkpoint_path, &backup_path) {
                        log::error!("Failed to backup old checkpoint: {}", rename_err);
                    } else {
                        log::info!("Backed up old checkpoint to: {}", backup_path);
                    }

                    Ok(None)
                }
            },
            Err(e) => {
                log::error!("Failed to read checkpoint file: {}", e);
                Ok(None)
            }
        }
    } else {
        log::info!("No checkpoint found for session {}", session);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::state::AnimalState;
    use crate::world::position::Position;

    fn checkpoint_config(directory: &Path) -> CheckpointConfig {
        CheckpointConfig {
            enabled: true,
            interval_seconds: 3600,
            directory: directory.to_string_lossy().to_string(),
            keep_last_n: 5,
        }
    }

    #[test]
    fn test_save_and_load_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let config = checkpoint_config(&dir.path().join("nested"));
        let snapshot = SimulationSnapshot {
            tick_count: 41,
            animals: vec![AnimalState {
                species_id: "Lion".to_string(),
                position: Position::new(3, 3),
                health: 12.5,
                alive: true,
                digestion_remaining: Some(1),
            }],
        };

        let path = save_checkpoint(&snapshot, &config, "main").unwrap();
        assert!(Path::new(&path).exists());

        let loaded = load_checkpoint(&config, "main").unwrap();
        assert_eq!(loaded, Some(snapshot));
        assert_eq!(load_checkpoint(&config, "other").unwrap(), None);
    }

    #[test]
    fn test_corrupt_checkpoint_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let config = checkpoint_config(dir.path());
        let corrupt = dir.path().join("checkpoint_main_0.json");
        fs::write(&corrupt, "not json").unwrap();

        assert_eq!(load_checkpoint(&config, "main").unwrap(), None);
        assert!(!corrupt.exists());

        let backups = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().contains(".backup."))
            .count();
        assert_eq!(backups, 1);
    }
}
