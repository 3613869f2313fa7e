//! File drivers around the in-memory codec.
//!
//! Single-file calls read the whole input, run the codec, and only then create
//! the output, so a failed call leaves nothing behind. Batch runs process
//! every file under a directory in parallel; one file failing is recorded in
//! the report and never stops the others.

use crate::error::{Error, Result};
use crate::huffman::{compress_with_stats, decode_with_stats, DecodeStats, EncodeStats};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Direction of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

impl Mode {
    /// Extension given to output files unless configured otherwise.
    pub fn default_extension(self) -> &'static str {
        match self {
            Mode::Encode => "bin",
            Mode::Decode => "txt",
        }
    }
}

/// Settings for [`run_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Directory walked recursively for input files.
    pub input: PathBuf,
    /// Directory that receives one output file per input.
    pub output: PathBuf,
    pub mode: Mode,
    /// Extension, without the dot, that replaces each input's extension.
    pub extension: String,
    /// Worker threads; 0 uses the global rayon pool.
    pub threads: usize,
}

impl BatchConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, mode: Mode) -> Self {
        BatchConfig {
            input: input.into(),
            output: output.into(),
            mode,
            extension: mode.default_extension().to_string(),
            threads: 0,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

/// A file that could not be processed.
#[derive(Debug)]
pub struct BatchError {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Files found under the input directory.
    pub total: usize,
    pub success: usize,
    pub elapsed: Duration,
    /// Per-file failures, including entries the directory walk could not read.
    pub errors: Vec<BatchError>,
}

/// Compresses the file at `input` into `output`. The returned stats include
/// the time spent writing.
pub fn encode_file(input: &Path, output: &Path) -> Result<EncodeStats> {
    let data = fs::read(input)?;
    let (packed, mut stats) = compress_with_stats(&data)?;
    let start = Instant::now();
    write_output(output, &packed)?;
    stats.write = start.elapsed();
    Ok(stats)
}

/// Restores the file at `input` into `output`. `elapsed` covers reading,
/// decoding and writing.
pub fn decode_file(input: &Path, output: &Path) -> Result<DecodeStats> {
    let start = Instant::now();
    let data = fs::read(input)?;
    let (decoded, mut stats) = decode_with_stats(&data)?;
    write_output(output, &decoded)?;
    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// Writes `bytes` to `path`, creating missing parent directories.
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Where the output for `file` goes: `<output_dir>/<file stem>.<extension>`.
pub fn output_path(file: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let mut name = file.file_stem().unwrap_or(file.as_os_str()).to_os_string();
    name.push(".");
    name.push(extension);
    output_dir.join(name)
}

/// Lists regular files under `dir`. Unreadable entries are returned as errors.
pub fn collect_files(dir: &Path) -> (Vec<PathBuf>, Vec<BatchError>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => {
                let path = err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                errors.push(BatchError {
                    path,
                    error: Error::Io(err.into()),
                });
            }
        }
    }
    (files, errors)
}

struct Progress {
    success: usize,
    errors: Vec<BatchError>,
}

fn process_file(mode: Mode, input: &Path, output: &Path) -> Result<()> {
    match mode {
        Mode::Encode => encode_file(input, output).map(|_| ()),
        Mode::Decode => decode_file(input, output).map(|_| ()),
    }
}

fn process_all(config: &BatchConfig, files: &[PathBuf], progress: &Mutex<Progress>) {
    files.par_iter().for_each(|file| {
        let target = output_path(file, &config.output, &config.extension);
        let outcome = process_file(config.mode, file, &target);

        let mut progress = progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match outcome {
            Ok(()) => {
                log::info!("{} -> {}", file.display(), target.display());
                progress.success += 1;
            }
            Err(error) => {
                log::warn!("{}: {}", file.display(), error);
                progress.errors.push(BatchError {
                    path: file.clone(),
                    error,
                });
            }
        }
    });
}

/// Encodes or decodes every file under `config.input`.
///
/// # Errors
///
/// Fails only if the input is not a directory or the worker pool cannot be
/// built. Per-file problems end up in [`BatchReport::errors`].
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    let started = Instant::now();
    if !config.input.is_dir() {
        return Err(Error::InvalidInput(format!(
            "{} is not a directory",
            config.input.display()
        )));
    }

    let (files, walk_errors) = collect_files(&config.input);
    log::debug!(
        "batch {:?}: {} files under {}",
        config.mode,
        files.len(),
        config.input.display()
    );

    let progress = Mutex::new(Progress {
        success: 0,
        errors: walk_errors,
    });

    if config.threads == 0 {
        process_all(config, &files, &progress);
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .map_err(|err| Error::InvalidInput(format!("cannot start worker pool: {}", err)))?;
        pool.install(|| process_all(config, &files, &progress));
    }

    let Progress {
        success,
        mut errors,
    } = progress
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    errors.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(BatchReport {
        input: config.input.clone(),
        output: config.output.clone(),
        total: files.len(),
        success,
        elapsed: started.elapsed(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_replaces_extension() {
        let out = output_path(Path::new("in/notes.md"), Path::new("out"), "bin");
        assert_eq!(out, PathBuf::from("out/notes.bin"));
        let out = output_path(Path::new("in/README"), Path::new("out"), "txt");
        assert_eq!(out, PathBuf::from("out/README.txt"));
        let out = output_path(Path::new("in/v1.2.log"), Path::new("out"), "bin");
        assert_eq!(out, PathBuf::from("out/v1.2.bin"));
    }

    #[test]
    fn test_config_defaults() {
        let config = BatchConfig::new("a", "b", Mode::Decode);
        assert_eq!(config.extension, "txt");
        assert_eq!(config.threads, 0);
        let config = BatchConfig::new("a", "b", Mode::Encode)
            .with_extension("huff")
            .with_threads(2);
        assert_eq!(config.extension, "huff");
        assert_eq!(config.threads, 2);
    }

    #[test]
    fn test_single_file_round_trip_creates_directories() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("plain.txt");
        fs::write(&input, b"she sells sea shells by the sea shore").unwrap();

        let packed = dir.path().join("nested/deeper/plain.bin");
        let stats = encode_file(&input, &packed).unwrap();
        assert_eq!(stats.original, 37);
        assert_eq!(fs::metadata(&packed).unwrap().len() as usize, stats.total());

        let restored = dir.path().join("restored/plain.txt");
        let stats = decode_file(&packed, &restored).unwrap();
        assert_eq!(stats.decoded, 37);
        assert_eq!(fs::read(&restored).unwrap(), fs::read(&input).unwrap());
    }

    #[test]
    fn test_file_stats_include_write_time() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("plain.txt");
        fs::write(&input, vec![b'k'; 10_000]).unwrap();

        let packed = dir.path().join("plain.bin");
        let outer = Instant::now();
        let stats = encode_file(&input, &packed).unwrap();
        assert!(stats.code_gen + stats.write <= outer.elapsed());

        let restored = dir.path().join("plain.txt.out");
        let outer = Instant::now();
        let stats = decode_file(&packed, &restored).unwrap();
        assert!(stats.elapsed <= outer.elapsed());
        assert_eq!(stats.decoded, 10_000);
    }

    #[test]
    fn test_failed_decode_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("garbage.bin");
        fs::write(&input, [5u8, 1, 2]).unwrap();
        let output = dir.path().join("out.txt");
        assert!(decode_file(&input, &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempdir().unwrap();
        let err = encode_file(&dir.path().join("absent"), &dir.path().join("x")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_batch_round_trip_with_failures() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("plain");
        fs::create_dir_all(plain.join("sub")).unwrap();
        fs::write(plain.join("one.txt"), b"first file").unwrap();
        fs::write(plain.join("two.md"), b"").unwrap();
        fs::write(plain.join("sub/three.txt"), vec![7u8; 4096]).unwrap();

        let packed = dir.path().join("packed");
        let report = run_batch(&BatchConfig::new(&plain, &packed, Mode::Encode)).unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.success, 3);
        assert!(report.errors.is_empty());
        assert!(packed.join("three.bin").exists());

        // A file that is not a valid container must not stop the batch.
        fs::write(packed.join("bogus.bin"), [9u8]).unwrap();

        let restored = dir.path().join("restored");
        let config = BatchConfig::new(&packed, &restored, Mode::Decode).with_threads(2);
        let report = run_batch(&config).unwrap();
        assert_eq!(report.total, 4);
        assert_eq!(report.success, 3);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, packed.join("bogus.bin"));
        assert!(matches!(report.errors[0].error, Error::Corruption(_)));

        assert_eq!(fs::read(restored.join("one.txt")).unwrap(), b"first file");
        assert!(fs::read(restored.join("two.txt")).unwrap().is_empty());
        assert_eq!(fs::read(restored.join("three.txt")).unwrap(), vec![7u8; 4096]);
        assert!(!restored.join("bogus.txt").exists());
    }

    #[test]
    fn test_batch_requires_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, b"x").unwrap();
        let config = BatchConfig::new(&file, dir.path(), Mode::Encode);
        assert!(matches!(run_batch(&config), Err(Error::InvalidInput(_))));
    }
}
