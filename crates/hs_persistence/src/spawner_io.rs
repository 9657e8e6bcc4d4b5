use std::fs;
use std::path::{Path, PathBuf};

use hs_core::Record;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default directory for spawner saves.
pub const SPAWNERS_DIR: &str = "assets/spawners";

/// Format version written by `save_spawners`.
pub const SPAWNER_FILE_VERSION: u32 = 1;

/// Error type for spawner file I/O.
#[derive(Debug, Error)]
pub enum SpawnerIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON serialization error: {0}")]
    Ron(#[from] ron::Error),
    #[error("RON parse error: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),
    #[error("unsupported spawner file version {0}")]
    UnsupportedVersion(u32),
}

/// On-disk layout: one record per spawner block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnerFile {
    pub version: u32,
    pub records: Vec<Record>,
}

/// Save spawner records to a RON file, creating parent directories.
pub fn save_spawners(path: &Path, records: &[Record]) -> Result<(), SpawnerIoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = SpawnerFile {
        version: SPAWNER_FILE_VERSION,
        records: records.to_vec(),
    };
    let pretty_config = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .enumerate_arrays(true);

    let ron_string = ron::ser::to_string_pretty(&file, pretty_config)?;
    fs::write(path, ron_string)?;
    Ok(())
}

/// Load spawner records from a RON file.
pub fn load_spawners(path: &Path) -> Result<Vec<Record>, SpawnerIoError> {
    let contents = fs::read_to_string(path)?;
    let file: SpawnerFile = ron::from_str(&contents)?;
    if file.version != SPAWNER_FILE_VERSION {
        return Err(SpawnerIoError::UnsupportedVersion(file.version));
    }
    Ok(file.records)
}

/// Generate a filename from a save name.
pub fn spawner_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}.ron", sanitized.to_lowercase())
}

/// Get the full path for a spawner save.
pub fn spawner_path(name: &str) -> PathBuf {
    Path::new(SPAWNERS_DIR).join(spawner_filename(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_core::BlockPos;
    use hs_entity_spawn::{encode, CreatureRegistry, SpawnerConfig};
    use tempfile::tempdir;

    #[test]
    fn save_and_load_spawners() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("spawners.ron");
        let registry = CreatureRegistry::default().with("minecraft:spider");

        let config = SpawnerConfig {
            delay_ticks: 7,
            spawn_count: 2,
            ..SpawnerConfig::resolve(
                &Record::new().with("EntityIdentifier", "minecraft:spider"),
                &registry,
            )
        };
        let records = vec![
            encode(&config, BlockPos::new(5, 12, -8)),
            encode(&SpawnerConfig::default(), BlockPos::new(0, 0, 0)),
        ];

        save_spawners(&path, &records).unwrap();
        let loaded = load_spawners(&path).unwrap();

        assert_eq!(loaded, records);
        assert_eq!(SpawnerConfig::resolve(&loaded[0], &registry), config);
    }

    #[test]
    fn future_versions_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.ron");
        fs::write(&path, "(version: 99, records: [])").unwrap();

        let err = load_spawners(&path).unwrap_err();
        assert!(matches!(err, SpawnerIoError::UnsupportedVersion(99)));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(version: 1, records: [").unwrap();

        assert!(matches!(load_spawners(&path), Err(SpawnerIoError::RonSpanned(_))));
    }

    #[test]
    fn spawner_filename_sanitizes() {
        assert_eq!(spawner_filename("Dungeon Level 1"), "dungeon_level_1.ron");
        assert_eq!(spawner_filename("nether-fortress"), "nether-fortress.ron");
        assert_eq!(spawner_filename("Hello World!"), "hello_world_.ron");
    }
}
