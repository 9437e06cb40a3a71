//! JSON chart renderer
//!
//! Writes each chart's finished data as a pretty-printed JSON document, one
//! file per chart, in place of an image.

use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::info;

use super::{BarChart, LineChart, Renderer};
use crate::config::Config;

/// JSON renderer errors
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// IO errors while creating or writing a chart file
    #[error("IO error on {path:?}: {source}")]
    Io {
        /// Path being written
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
    /// JSON serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders charts into JSON files below an output directory.
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    line_path: PathBuf,
    bar_path: PathBuf,
}

impl JsonRenderer {
    /// Create a new instance of `JsonRenderer`
    #[must_use]
    pub fn new(output_dir: &Path, line_file_name: &str, bar_file_name: &str) -> Self {
        Self {
            line_path: output_dir.join(line_file_name),
            bar_path: output_dir.join(bar_file_name),
        }
    }

    /// Create a renderer using the output locations in `config`
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.output_dir,
            &config.line_chart.file_name,
            &config.bar_chart.file_name,
        )
    }

    /// Where the line chart is written
    #[must_use]
    pub fn line_path(&self) -> &Path {
        &self.line_path
    }

    /// Where the bar chart is written
    #[must_use]
    pub fn bar_path(&self) -> &Path {
        &self.bar_path
    }
}

fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), Error> {
    let io_err = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

impl Renderer for JsonRenderer {
    fn render_line(&mut self, chart: &LineChart) -> Result<(), super::Error> {
        write_document(&self.line_path, chart)?;
        info!("Wrote line chart to {path}", path = self.line_path.display());
        Ok(())
    }

    fn render_bar(&mut self, chart: &BarChart) -> Result<(), super::Error> {
        write_document(&self.bar_path, chart)?;
        info!("Wrote bar chart to {path}", path = self.bar_path.display());
        Ok(())
    }
}
