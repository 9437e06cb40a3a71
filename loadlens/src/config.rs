//! This module controls configuration parsing from the end user. Every field
//! has a default, an absent configuration file is equivalent to an empty one.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Errors produced by [`Config`]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error for a serde [`serde_yaml`].
    #[error("Failed to deserialize yaml: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    /// Error reading config file
    #[error("Failed to read config file {path:?}: {source}")]
    ReadFile {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: Box<io::Error>,
    },
}

/// How the status code histogram is laid out as bars.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistogramMode {
    /// A single band of bars, one per status code.
    #[default]
    Unified,
    /// Separate bands for 2xx codes and for everything else.
    Partitioned,
}

/// Returned when a [`HistogramMode`] cannot be parsed from a string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown histogram mode {0:?}, expected 'unified' or 'partitioned'")]
pub struct UnknownHistogramMode(String);

impl FromStr for HistogramMode {
    type Err = UnknownHistogramMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unified" => Ok(Self::Unified),
            "partitioned" => Ok(Self::Partitioned),
            _ => Err(UnknownHistogramMode(s.to_string())),
        }
    }
}

impl fmt::Display for HistogramMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unified => write!(f, "unified"),
            Self::Partitioned => write!(f, "partitioned"),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_line_title() -> String {
    "Latency Over Requests".to_string()
}

fn default_line_file_name() -> String {
    "latency.json".to_string()
}

fn default_bar_title() -> String {
    "Status Codes Over Time".to_string()
}

fn default_bar_file_name() -> String {
    "status_codes.json".to_string()
}

/// Presentation of the latency line chart
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LineChartOptions {
    /// Chart title
    #[serde(default = "default_line_title")]
    pub title: String,
    /// File written below [`Config::output_dir`]
    #[serde(default = "default_line_file_name")]
    pub file_name: String,
}

impl Default for LineChartOptions {
    fn default() -> Self {
        Self {
            title: default_line_title(),
            file_name: default_line_file_name(),
        }
    }
}

/// Presentation of the status code bar chart
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BarChartOptions {
    /// Chart title
    #[serde(default = "default_bar_title")]
    pub title: String,
    /// File written below [`Config::output_dir`]
    #[serde(default = "default_bar_file_name")]
    pub file_name: String,
    /// Bar layout
    #[serde(default)]
    pub histogram: HistogramMode,
}

impl Default for BarChartOptions {
    fn default() -> Self {
        Self {
            title: default_bar_title(),
            file_name: default_bar_file_name(),
            histogram: HistogramMode::default(),
        }
    }
}

/// Main configuration struct for this program
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory charts are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// The latency line chart
    #[serde(default)]
    pub line_chart: LineChartOptions,
    /// The status code bar chart
    #[serde(default)]
    pub bar_chart: BarChartOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            line_chart: LineChartOptions::default(),
            bar_chart: BarChartOptions::default(),
        }
    }
}

/// Load configuration from a YAML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a valid
/// configuration.
pub fn load_config_from_path(path: &Path) -> Result<Config, Error> {
    let contents = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    // An empty document deserializes as unit, not as a map
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn config_deserializes() -> Result<(), Error> {
        let contents = r#"
output_dir: "/tmp/charts"
line_chart:
  title: "Latency Over Time"
bar_chart:
  file_name: "codes.json"
  histogram: partitioned
"#;
        let config: Config = serde_yaml::from_str(contents)?;
        assert_eq!(
            config,
            Config {
                output_dir: PathBuf::from("/tmp/charts"),
                line_chart: LineChartOptions {
                    title: String::from("Latency Over Time"),
                    file_name: String::from("latency.json"),
                },
                bar_chart: BarChartOptions {
                    title: String::from("Status Codes Over Time"),
                    file_name: String::from("codes.json"),
                    histogram: HistogramMode::Partitioned,
                },
            }
        );
        Ok(())
    }

    #[test]
    fn empty_map_is_default() -> Result<(), Error> {
        let config: Config = serde_yaml::from_str("{}")?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("colour: blue\n");
        assert!(result.is_err());

        let result: Result<Config, _> = serde_yaml::from_str("bar_chart:\n  width: 8\n");
        assert!(result.is_err());
    }

    #[test]
    fn histogram_mode_from_str() {
        assert_eq!("unified".parse(), Ok(HistogramMode::Unified));
        assert_eq!("partitioned".parse(), Ok(HistogramMode::Partitioned));
        assert!("banded".parse::<HistogramMode>().is_err());
        assert_eq!(HistogramMode::Partitioned.to_string(), "partitioned");
    }

    #[test]
    fn load_from_file() -> Result<(), Error> {
        let mut file = tempfile::NamedTempFile::new().expect("create temp config");
        writeln!(file, "bar_chart:\n  histogram: partitioned").expect("write config");

        let config = load_config_from_path(file.path())?;
        assert_eq!(config.bar_chart.histogram, HistogramMode::Partitioned);
        assert_eq!(config.line_chart, LineChartOptions::default());
        Ok(())
    }

    #[test]
    fn load_empty_file_is_default() -> Result<(), Error> {
        let file = tempfile::NamedTempFile::new().expect("create temp config");
        let config = load_config_from_path(file.path())?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn load_missing_file_names_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("absent.yaml");
        match load_config_from_path(&path) {
            Err(Error::ReadFile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
