//! Data persistence
//!
//! JSON/YAML readers and writers for corpora and extracted triples, plus the
//! on-disk layout of the data directory.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::config::{DataConfig, OutputConfig, OutputFormat};
use crate::{Result, SvoError};

/// Highest pipeline phase with its own output directory
pub const MAX_PHASE: u8 = 4;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SvoError + '_ {
    move |source| SvoError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path).map(BufReader::new).map_err(io_error(path))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    File::create(path).map(BufWriter::new).map_err(io_error(path))
}

/// Load data from a JSON file
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    Ok(serde_json::from_reader(open(path)?)?)
}

/// Save data to a JSON file with two-space indentation
pub fn save_json<T: Serialize + ?Sized>(data: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n").map_err(io_error(path))?;
    writer.flush().map_err(io_error(path))
}

/// Load data from a YAML file
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    Ok(serde_yaml::from_reader(open(path)?)?)
}

/// Save data to a YAML file in block style
pub fn save_yaml<T: Serialize + ?Sized>(data: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create(path)?;
    serde_yaml::to_writer(&mut writer, data)?;
    writer.flush().map_err(io_error(path))
}

/// Infer the serialization format from a file extension
pub fn format_of(path: &Path) -> Result<OutputFormat> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("json") => Ok(OutputFormat::Json),
        Some("yaml") | Some("yml") => Ok(OutputFormat::Yaml),
        _ => Err(SvoError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load JSON or YAML depending on the file extension
pub fn load_auto<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    match format_of(path)? {
        OutputFormat::Json => load_json(path),
        OutputFormat::Yaml => load_yaml(path),
    }
}

/// Save JSON or YAML depending on the file extension
pub fn save_auto<T: Serialize + ?Sized>(data: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match format_of(path)? {
        OutputFormat::Json => save_json(data, path),
        OutputFormat::Yaml => save_yaml(data, path),
    }
}

// ============================================================================
// Data directory layout
// ============================================================================

/// Resolves paths inside the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirs {
    root: PathBuf,
}

impl DataDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(config.root.clone())
    }

    /// Data directory, or the output directory of `phase` (1 to 4)
    pub fn data_dir(&self, phase: Option<u8>) -> Result<PathBuf> {
        match phase {
            None => Ok(self.root.clone()),
            Some(p) if (1..=MAX_PHASE).contains(&p) => {
                Ok(self.root.join(format!("phase_{p}_outputs")))
            }
            Some(p) => Err(SvoError::InvalidPhase(p)),
        }
    }

    /// Output file for `input` in the directory of `phase`
    ///
    /// Named `<input stem>_<file stem>.<ext>` so runs over different inputs
    /// land side by side; inputs without a stem fall back to `<file stem>.<ext>`.
    pub fn phase_output(&self, phase: u8, input: &Path, output: &OutputConfig) -> Result<PathBuf> {
        let name = match input.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !stem.is_empty() => {
                format!("{}_{}.{}", stem, output.file_stem, output.format.extension())
            }
            _ => format!("{}.{}", output.file_stem, output.format.extension()),
        };
        Ok(self.data_dir(Some(phase))?.join(name))
    }

    /// Directory holding unprocessed inputs
    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Triple;

    fn sample() -> Vec<Triple> {
        vec![
            Triple::new("Python", "use", "indentation"),
            Triple::new("東京", "be", "首都"),
        ]
    }

    #[test]
    fn test_json_roundtrip_keeps_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/triples.json");

        save_json(&sample(), &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("東京"));
        assert!(raw.contains("\n  {"));

        let loaded: Vec<Triple> = load_json(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triples.yml");

        save_auto(&sample(), &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("subject: Python"));

        let loaded: Vec<Triple> = load_auto(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_unknown_extension() {
        let err = save_auto(&sample(), "triples.csv").unwrap_err();
        assert!(matches!(err, SvoError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_json::<Vec<Triple>>("/nonexistent/triples.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/triples.json"));
    }

    #[test]
    fn test_data_dirs() {
        let dirs = DataDirs::new("/srv/data");

        assert_eq!(dirs.data_dir(None).unwrap(), PathBuf::from("/srv/data"));
        assert_eq!(
            dirs.data_dir(Some(2)).unwrap(),
            PathBuf::from("/srv/data/phase_2_outputs")
        );
        assert_eq!(dirs.raw_dir(), PathBuf::from("/srv/data/raw"));
        assert!(matches!(dirs.data_dir(Some(0)), Err(SvoError::InvalidPhase(0))));
        assert!(matches!(dirs.data_dir(Some(5)), Err(SvoError::InvalidPhase(5))));
    }

    #[test]
    fn test_phase_output_named_after_input() {
        let dirs = DataDirs::new("/srv/data");
        let output = OutputConfig {
            format: OutputFormat::Yaml,
            ..Default::default()
        };

        let first = dirs
            .phase_output(3, Path::new("raw/wiki_python.json"), &output)
            .unwrap();
        let second = dirs
            .phase_output(3, Path::new("raw/wiki_rust.yaml"), &output)
            .unwrap();

        assert_eq!(
            first,
            PathBuf::from("/srv/data/phase_3_outputs/wiki_python_triples.yaml")
        );
        assert_ne!(first, second);
        assert_eq!(
            dirs.phase_output(1, Path::new(""), &output).unwrap(),
            PathBuf::from("/srv/data/phase_1_outputs/triples.yaml")
        );
        assert!(matches!(
            dirs.phase_output(9, Path::new("a.json"), &output),
            Err(SvoError::InvalidPhase(9))
        ));
    }
}
