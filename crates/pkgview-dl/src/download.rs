use std::{
    fs::{self, File},
    io::{self, BufRead, Read, Write},
    path::{Path, PathBuf},
};

use tracing::debug;
use ureq::{
    http::{header::CONTENT_LENGTH, Response},
    Body,
};

use crate::{
    error::DownloadError,
    http::Http,
    types::{DownloadStatus, OverwriteMode, Progress},
};

type ProgressCallback = Box<dyn Fn(Progress) + Send + Sync>;

pub struct Download {
    pub url: String,
    pub output: PathBuf,
    pub overwrite: OverwriteMode,
    pub on_progress: Option<ProgressCallback>,
}

impl Download {
    /// Creates a download of `url` into the file at `output`.
    ///
    /// Existing files are handled with [`OverwriteMode::Prompt`] unless
    /// changed through [`Download::overwrite`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pkgview_dl::{download::Download, types::OverwriteMode};
    ///
    /// let dl = Download::new("https://example.com/tool.exe", "/tmp/tool.exe")
    ///     .overwrite(OverwriteMode::Force);
    /// // `dl` is ready to call `execute()`
    /// ```
    pub fn new(url: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output: output.into(),
            overwrite: OverwriteMode::Prompt,
            on_progress: None,
        }
    }

    pub fn overwrite(mut self, overwrite: OverwriteMode) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Registers a callback invoked with `Starting`, `Chunk` and `Complete`
    /// events while the body is streamed.
    pub fn progress<F>(mut self, on_progress: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Box::new(on_progress));
        self
    }

    /// Downloads the URL into the output path.
    ///
    /// If a file or directory already exists at the output path, the
    /// overwrite mode decides whether to continue; declining yields
    /// [`DownloadStatus::Kept`]. The request is sent before the output file
    /// is touched, but a failure while streaming leaves the partially written
    /// file in place.
    pub fn execute(self) -> Result<DownloadStatus, DownloadError> {
        if self.output.exists() {
            let replace = match self.overwrite {
                OverwriteMode::Skip => false,
                OverwriteMode::Force => true,
                OverwriteMode::Prompt => prompt_overwrite(&self.output)?,
            };
            if !replace {
                return Ok(DownloadStatus::Kept {
                    path: self.output,
                });
            }
        }

        if let Some(parent) = self.output.parent() {
            fs::create_dir_all(parent)?;
        }

        let resp = Http::fetch(&self.url)?;
        let total = Self::parse_content_length(&resp);

        debug!("Writing {} to {}", self.url, self.output.display());
        let mut file = File::create(&self.output)?;
        let mut reader = resp.into_body().into_reader();
        let bytes = stream_to(&mut reader, &mut file, total, self.on_progress.as_deref())?;

        Ok(DownloadStatus::Downloaded {
            path: self.output,
            bytes,
        })
    }

    /// Returns the `Content-Length` of the response, or 0 when absent.
    fn parse_content_length(resp: &Response<Body>) -> u64 {
        resp.headers()
            .get(CONTENT_LENGTH)
            .and_then(|h| h.to_str().ok())
            .and_then(|len| len.parse::<u64>().ok())
            .unwrap_or(0)
    }
}

/// Copies `reader` into `writer` in 8 KiB chunks, reporting progress.
///
/// Returns the number of bytes written.
pub fn stream_to<R, W>(
    reader: &mut R,
    writer: &mut W,
    total: u64,
    on_progress: Option<&(dyn Fn(Progress) + Send + Sync)>,
) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    if let Some(cb) = on_progress {
        cb(Progress::Starting {
            total,
        });
    }

    let mut buffer = [0u8; 8192];
    let mut downloaded = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };

        writer.write_all(&buffer[..n])?;
        downloaded += n as u64;

        if let Some(cb) = on_progress {
            cb(Progress::Chunk {
                current: downloaded,
                total,
            });
        }
    }

    writer.flush()?;

    if let Some(cb) = on_progress {
        cb(Progress::Complete {
            total: downloaded,
        });
    }

    Ok(downloaded)
}

/// Returns `true` only for a case-insensitive `Y` answer.
///
/// An empty answer declines even though the prompt reads `[Y/n]`.
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Asks on stdin whether the existing `path` should be replaced.
fn prompt_overwrite(path: &Path) -> io::Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    ask_overwrite(path, &mut stdin.lock(), &mut stdout.lock())
}

fn ask_overwrite<R: BufRead, W: Write>(path: &Path, input: &mut R, output: &mut W) -> io::Result<bool> {
    writeln!(output, "{} already exists", path.display())?;
    writeln!(output, "Do you want to replace it? [Y/n]")?;
    write!(output, "> ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(is_confirmed(&line))
}
