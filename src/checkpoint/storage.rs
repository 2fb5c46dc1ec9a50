use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

fn file_prefix(session: &str) -> String {
    format!("checkpoint_{}_", session)
}

fn list_checkpoints(directory: &str, session: &str) -> Vec<(PathBuf, DateTime<Utc>)> {
    let dir = Path::new(directory);
    let prefix = file_prefix(session);
    let mut checkpoints: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
            let matches_session = path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|name| name.starts_with(&prefix))
                .unwrap_or(false);

            if is_json && matches_session {
                if let Ok(metadata) = entry.metadata() {
                    if let Ok(modified) = metadata.modified() {
                        let datetime: DateTime<Utc> = modified.into();
                        checkpoints.push((path, datetime));
                    }
                }
            }
        }
    }

    // Newest first; file names carry a millisecond timestamp for ties.
    checkpoints.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    checkpoints
}

pub fn find_latest_checkpoint(directory: &str, session: &str) -> Option<PathBuf> {
    list_checkpoints(directory, session)
        .into_iter()
        .next()
        .map(|(path, _)| path)
}

pub fn create_checkpoint_path(directory: &str, session: &str) -> PathBuf {
    let now: DateTime<Utc> = Utc::now();
    let filename = format!(
        "{}{}.json",
        file_prefix(session),
        now.format("%Y-%m-%d_%H-%M-%S%.3f")
    );

    Path::new(directory).join(filename)
}

pub fn cleanup_old_checkpoints(directory: &str, session: &str, keep_last_n: usize) -> Result<(), Box<dyn std::error::Error>> {
    for (path, _) in list_checkpoints(directory, session).iter().skip(keep_last_n) {
        log::info!("Deleting old checkpoint: {:?}", path);
        let _ = fs::remove_file(path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_checkpoint_path() {
        let path = create_checkpoint_path("test_checkpoints", "main");
        let name = path.to_str().unwrap();
        assert!(name.starts_with("test_checkpoints"));
        assert!(name.ends_with(".json"));
        assert!(name.contains("checkpoint_main_"));
    }

    #[test]
    fn test_latest_is_scoped_to_session() {
        let dir = tempfile::tempdir().unwrap();
        let directory = dir.path().to_str().unwrap();

        fs::write(dir.path().join("checkpoint_a_1.json"), "{}").unwrap();
        fs::write(dir.path().join("checkpoint_b_1.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let latest = find_latest_checkpoint(directory, "a").unwrap();
        assert!(latest.ends_with("checkpoint_a_1.json"));
        assert!(find_latest_checkpoint(directory, "c").is_none());
    }

    #[test]
    fn test_missing_directory() {
        assert!(find_latest_checkpoint("does/not/exist", "main").is_none());
        assert!(cleanup_old_checkpoints("does/not/exist", "main", 1).is_ok());
    }

    #[test]
    fn test_cleanup_keeps_last_n() {
        let dir = tempfile::tempdir().unwrap();
        let directory = dir.path().to_str().unwrap();

        for i in 0..4 {
            fs::write(dir.path().join(format!("checkpoint_main_{}.json", i)), "{}").unwrap();
        }
        fs::write(dir.path().join("checkpoint_other_0.json"), "{}").unwrap();

        cleanup_old_checkpoints(directory, "main", 2).unwrap();

        assert_eq!(list_checkpoints(directory, "main").len(), 2);
        assert_eq!(list_checkpoints(directory, "other").len(), 1);
    }
}
