use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "oraculo.toml";
const DEFAULT_MEMORY_DEPTH: usize = 3;
const DEFAULT_DOSSIER_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSettings {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OraculoSettings {
    /// Directory holding the profile, history and altar files
    pub journal_dir: PathBuf,
    pub ephemeris_path: Option<PathBuf>,
    pub location: Option<LocationSettings>,
    /// Past readings quoted in a portal prompt
    pub memory_depth: usize,
    /// Past readings handed to Metatron
    pub dossier_depth: usize,
    /// File the settings were read from, if any
    pub source: Option<PathBuf>,
}

impl Default for OraculoSettings {
    fn default() -> Self {
        Self {
            journal_dir: default_journal_dir(),
            ephemeris_path: None,
            location: None,
            memory_depth: DEFAULT_MEMORY_DEPTH,
            dossier_depth: DEFAULT_DOSSIER_DEPTH,
            source: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocationToml {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RootConfigToml {
    #[serde(default)]
    journal_dir: Option<PathBuf>,
    #[serde(default)]
    ephemeris_path: Option<PathBuf>,
    #[serde(default)]
    location: Option<LocationToml>,
    #[serde(default = "default_memory_depth")]
    memory_depth: usize,
    #[serde(default = "default_dossier_depth")]
    dossier_depth: usize,
}

fn default_memory_depth() -> usize {
    DEFAULT_MEMORY_DEPTH
}

fn default_dossier_depth() -> usize {
    DEFAULT_DOSSIER_DEPTH
}

/// `<data_dir>/oraculo`, or `./oraculo-data` when the platform has no data dir.
pub fn default_journal_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("oraculo"))
        .unwrap_or_else(|| PathBuf::from("oraculo-data"))
}

/// Places a config file is looked for, in order.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(p) = explicit {
        paths.push(p.to_path_buf());
    }
    paths.push(Path::new("configs").join(CONFIG_FILE_NAME));
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("oraculo").join(CONFIG_FILE_NAME));
    }
    paths
}

pub fn parse_settings(text: &str) -> anyhow::Result<OraculoSettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse {CONFIG_FILE_NAME}: {e}"))?;
    let RootConfigToml {
        journal_dir,
        ephemeris_path,
        location,
        memory_depth,
        dossier_depth,
    } = root;

    let location = match location {
        Some(LocationToml { lat, lon }) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                anyhow::bail!("location out of range: lat={lat}, lon={lon}");
            }
            Some(LocationSettings { lat, lon })
        }
        None => None,
    };
    if dossier_depth == 0 {
        anyhow::bail!("dossier_depth must be at least 1");
    }

    Ok(OraculoSettings {
        journal_dir: journal_dir.unwrap_or_else(default_journal_dir),
        ephemeris_path,
        location,
        memory_depth,
        dossier_depth,
        source: None,
    })
}

/// Load settings from the first existing candidate path.
///
/// An explicit path that does not exist or cannot be read is an error, as is
/// any candidate that exists but cannot be read. With no explicit path and no
/// file found, defaults are returned.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<OraculoSettings> {
    if let Some(p) = explicit {
        if !p.exists() {
            anyhow::bail!("Config file does not exist: {}", p.display());
        }
    }
    for (i, path) in candidate_paths(explicit).into_iter().enumerate() {
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound && (explicit.is_none() || i > 0) => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config {}", path.display()))
            }
        };
        let mut settings = parse_settings(&text)
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
        log::info!("config: loaded {}", path.display());
        settings.source = Some(path);
        return Ok(settings);
    }
    log::debug!("config: no {CONFIG_FILE_NAME} found, using defaults");
    Ok(OraculoSettings::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.memory_depth, 3);
        assert_eq!(settings.dossier_depth, 10);
        assert_eq!(settings.journal_dir, default_journal_dir());
        assert!(settings.location.is_none());
        assert!(settings.ephemeris_path.is_none());
    }

    #[test]
    fn test_full_file() {
        let text = r#"
            journal_dir = "/tmp/oraculo"
            ephemeris_path = "/usr/share/swisseph"
            memory_depth = 5

            [location]
            lat = -23.55
            lon = -46.63
        "#;
        let settings = parse_settings(text).unwrap();
        assert_eq!(settings.journal_dir, PathBuf::from("/tmp/oraculo"));
        assert_eq!(settings.ephemeris_path, Some(PathBuf::from("/usr/share/swisseph")));
        assert_eq!(settings.memory_depth, 5);
        assert_eq!(settings.dossier_depth, 10);
        assert_eq!(settings.location, Some(LocationSettings { lat: -23.55, lon: -46.63 }));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_settings("[location]\nlat = 95.0\nlon = 0.0").is_err());
        assert!(parse_settings("dossier_depth = 0").is_err());
        assert!(parse_settings("memory_depth = \"three\"").is_err());
        assert!(parse_settings("unknown_key = 1").is_err());
    }

    #[test]
    fn test_explicit_path_first() {
        let paths = candidate_paths(Some(Path::new("/etc/oraculo.toml")));
        assert_eq!(paths[0], PathBuf::from("/etc/oraculo.toml"));
        assert_eq!(paths[1], Path::new("configs").join("oraculo.toml"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oraculo.toml");
        fs::write(&path, "memory_depth = 1\n").unwrap();
        let settings = load_settings(Some(path.as_path())).unwrap();
        assert_eq!(settings.memory_depth, 1);
        assert_eq!(settings.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(Some(dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn test_unreadable_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(dir.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"), "{err}");
    }
}
