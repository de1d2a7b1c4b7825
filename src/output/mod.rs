use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::transcript::FetchedTranscript;
use crate::Result;

pub mod clipboard;
pub mod formatters;

pub use formatters::*;

/// Where the user asked the transcript to go
#[derive(Debug, Clone)]
pub struct OutputRequest {
    pub file: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub clipboard: bool,
    pub format: OutputFormat,
}

/// Resolved primary destination; the clipboard is handled separately
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget<'a> {
    Directory(&'a Path),
    File(&'a Path),
    Stdout,
}

impl OutputRequest {
    /// A directory takes precedence over a file path
    pub fn target(&self) -> OutputTarget<'_> {
        match (&self.dir, &self.file) {
            (Some(dir), _) => OutputTarget::Directory(dir),
            (None, Some(file)) => OutputTarget::File(file),
            (None, None) => OutputTarget::Stdout,
        }
    }
}

/// Render a fetched transcript in the requested format
pub fn render(transcript: &FetchedTranscript, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => format_as_text(&transcript.entries),
        OutputFormat::Json => format_as_json(transcript)?,
        OutputFormat::Srt => format_as_srt(&transcript.entries),
        OutputFormat::Vtt => format_as_vtt(&transcript.entries),
    };
    Ok(content)
}

/// Save formatted transcript to an exact path
pub fn save_to_file(content: &str, path: &Path) -> Result<()> {
    tracing::debug!("Writing transcript to {}", path.display());
    fs_err::write(path, content)?;
    Ok(())
}

/// Save formatted transcript as `<dir>/<stem>.<ext>`, creating `dir` if needed
pub fn save_to_directory(
    content: &str,
    dir: &Path,
    stem: &str,
    format: &OutputFormat,
) -> Result<PathBuf> {
    fs_err::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", stem, format.extension()));
    save_to_file(content, &path)?;
    Ok(path)
}

/// Print formatted transcript followed by a newline
pub fn print_to_writer<W: Write>(content: &str, out: &mut W) -> Result<()> {
    writeln!(out, "{}", content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn request(file: Option<&str>, dir: Option<&str>) -> OutputRequest {
        OutputRequest {
            file: file.map(PathBuf::from),
            dir: dir.map(PathBuf::from),
            clipboard: false,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn test_target_resolution() {
        assert_eq!(request(None, None).target(), OutputTarget::Stdout);
        assert_eq!(
            request(Some("a.txt"), None).target(),
            OutputTarget::File(Path::new("a.txt"))
        );
        assert_eq!(
            request(Some("a.txt"), Some("out")).target(),
            OutputTarget::Directory(Path::new("out"))
        );
    }

    #[test]
    fn test_save_to_directory_creates_nested_dirs() {
        let workdir = TempDir::new().unwrap();
        let dir = workdir.path().join("a").join("b");

        let path = save_to_directory("hello", &dir, "My_Title", &OutputFormat::Text).unwrap();

        assert_eq!(path, dir.join("My_Title.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");

        // existing directory is fine
        save_to_directory("again", &dir, "My_Title", &OutputFormat::Vtt).unwrap();
        assert!(dir.join("My_Title.vtt").exists());
    }

    #[test]
    fn test_save_to_file_reports_missing_parent() {
        let workdir = TempDir::new().unwrap();
        let path = workdir.path().join("missing").join("t.txt");
        let err = save_to_file("x", &path).unwrap_err();
        assert!(err.to_string().contains("t.txt"));
    }
}
