//! Chart output: file export and interactive display.

use std::path::{Path, PathBuf};

use plotly::Plot;

use crate::error::{ReportError, Result};

/// The 20-colour categorical "tab20" palette.
pub const TAB20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// File format of a written chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Self-contained interactive HTML page.
    Html,
    /// Static PNG image (requires the `png` feature).
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Png => "png",
        }
    }

    /// PNG when this build can export it, HTML otherwise.
    pub fn preferred() -> Self {
        if cfg!(feature = "png") {
            Self::Png
        } else {
            Self::Html
        }
    }
}

/// Side effects requested for a rendered chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOutput {
    /// Where to write the chart, if anywhere.
    pub path: Option<PathBuf>,
    /// Open the chart in the browser after rendering.
    pub show: bool,
    pub format: ImageFormat,
}

impl Default for ChartOutput {
    fn default() -> Self {
        Self {
            path: None,
            show: false,
            format: ImageFormat::preferred(),
        }
    }
}

impl ChartOutput {
    /// Write to `path` in `format`, without display.
    pub fn file(path: impl Into<PathBuf>, format: ImageFormat) -> Self {
        Self {
            path: Some(path.into()),
            show: false,
            format,
        }
    }

    #[must_use]
    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }
}

/// Writes and/or shows a finished plot.
pub(crate) fn emit(plot: &Plot, output: &ChartOutput, width: usize, height: usize) -> Result<()> {
    if let Some(path) = &output.path {
        match output.format {
            ImageFormat::Html => write_html(plot, path)?,
            ImageFormat::Png => write_png(plot, path, width, height)?,
        }
        tracing::info!(path = %path.display(), "wrote chart");
    }
    if output.show {
        plot.show();
    }
    Ok(())
}

fn write_html(plot: &Plot, path: &Path) -> Result<()> {
    std::fs::write(path, plot.to_html()).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory of the Kaleido executable used for PNG export.
pub const KALEIDO_PATH_ENV: &str = "KALEIDO_PATH";

#[cfg(windows)]
const KALEIDO_BIN: &str = "kaleido.cmd";
#[cfg(not(windows))]
const KALEIDO_BIN: &str = "kaleido";

/// Locates the Kaleido executable through `KALEIDO_PATH`.
///
/// PNG export is refused up front when this returns `None`; Plotly's
/// exporter would otherwise terminate the process.
pub fn kaleido_executable() -> Option<PathBuf> {
    let dir = std::env::var(KALEIDO_PATH_ENV).ok()?;
    kaleido_in(Path::new(&dir))
}

fn kaleido_in(dir: &Path) -> Option<PathBuf> {
    let binary = dir.join(KALEIDO_BIN);
    binary.is_file().then_some(binary)
}

#[cfg(feature = "png")]
fn write_png(plot: &Plot, path: &Path, width: usize, height: usize) -> Result<()> {
    export_png(plot, path, width, height, kaleido_executable().as_deref())
}

#[cfg(feature = "png")]
fn export_png(
    plot: &Plot,
    path: &Path,
    width: usize,
    height: usize,
    exporter: Option<&Path>,
) -> Result<()> {
    use std::panic::{self, AssertUnwindSafe};

    let Some(exporter) = exporter else {
        return Err(ReportError::ExporterUnavailable {
            env: KALEIDO_PATH_ENV,
        });
    };
    remove_stale(path)?;
    tracing::debug!(exporter = %exporter.display(), path = %path.display(), "exporting PNG");

    let exported = panic::catch_unwind(AssertUnwindSafe(|| {
        plot.write_image(path, plotly::ImageFormat::PNG, width, height, 1.0);
    }));
    let written = std::fs::metadata(path).is_ok_and(|meta| meta.len() > 0);
    if exported.is_ok() && written {
        return Ok(());
    }
    // A failed conversion leaves an empty file behind.
    remove_stale(path)?;
    Err(ReportError::ExportFailed {
        path: path.to_path_buf(),
    })
}

#[cfg(feature = "png")]
fn remove_stale(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    std::fs::remove_file(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(feature = "png"))]
fn write_png(_plot: &Plot, _path: &Path, _width: usize, _height: usize) -> Result<()> {
    Err(ReportError::UnsupportedFormat { format: "PNG" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(ImageFormat::Html.extension(), "html");
        assert_eq!(ImageFormat::Png.extension(), "png");
    }

    #[test]
    fn test_default_output_has_no_side_effects() {
        let output = ChartOutput::default();
        assert!(output.path.is_none());
        assert!(!output.show);
        assert!(emit(&Plot::new(), &output, 10, 10).is_ok());
    }

    #[cfg(not(feature = "png"))]
    #[test]
    fn test_png_requires_feature() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = ChartOutput::file(dir.path().join("chart.png"), ImageFormat::Png);
        let result = emit(&Plot::new(), &output, 10, 10);
        assert!(matches!(result, Err(ReportError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_kaleido_lookup_needs_the_executable() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(kaleido_in(dir.path()).is_none());

        std::fs::write(dir.path().join(KALEIDO_BIN), "").unwrap();
        assert_eq!(kaleido_in(dir.path()), Some(dir.path().join(KALEIDO_BIN)));
    }

    #[cfg(feature = "png")]
    #[test]
    fn test_png_without_exporter_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chart.png");

        let result = export_png(&Plot::new(), &path, 10, 10, None);

        assert!(matches!(
            result,
            Err(ReportError::ExporterUnavailable { .. })
        ));
        assert!(!path.exists());
    }

    #[cfg(feature = "png")]
    #[test]
    fn test_png_is_the_preferred_format() {
        assert_eq!(ImageFormat::preferred(), ImageFormat::Png);
        assert_eq!(ChartOutput::default().format, ImageFormat::Png);
    }

    #[test]
    fn test_html_is_written() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chart.html");
        emit(&Plot::new(), &ChartOutput::file(&path, ImageFormat::Html), 10, 10).unwrap();
        assert!(path.is_file());
    }
}
