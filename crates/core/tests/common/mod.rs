//! Fixtures for writing hex record files, operand images and configs into
//! scratch directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::{GrayImage, Luma};
use imgdiv_core::codec::{self, HexByteOrder};
use imgdiv_core::config::Config;
use ndarray::Array2;

/// Installs a test-writer `tracing` subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a thread-local subscriber and returns its result with the
/// plain-text log lines it emitted.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let sink = SharedBuf::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&sink.0.lock().unwrap()).into_owned();
    (out, text)
}

/// Writes `lines` verbatim, one per line, newline-terminated.
pub fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&path, text).unwrap();
    path
}

/// Writes an array as MSB-first hex records in row-major order.
pub fn write_frame(dir: &Path, name: &str, frame: &Array2<f32>) -> PathBuf {
    let lines: Vec<String> = frame
        .iter()
        .map(|&v| codec::encode_f32(v, HexByteOrder::MsbFirst))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_lines(dir, name, &refs)
}

/// Writes an 8-bit grayscale PNG built from `f(x, y)`.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> PathBuf {
    let path = dir.join(name);
    let image = GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)]));
    image.save(&path).unwrap();
    path
}

/// A smooth ramp in `[0, 1)` with distinct values per pixel.
pub fn ramp(rows: usize, cols: usize) -> Array2<f32> {
    let total = (rows * cols) as f32;
    Array2::from_shape_fn((rows, cols), |(r, c)| (r * cols + c) as f32 / total)
}

/// Default config with every path rooted in `dir` and the given frame shape.
pub fn config_in(dir: &Path, height: usize, width: usize) -> Config {
    let mut config = Config::default();
    config.paths = config.paths.under(dir);
    config.image.height = height;
    config.image.width = width;
    config
}
