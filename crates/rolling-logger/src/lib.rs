//! Rolling Logger
//!
//! `tracing` subscriber for browser apps. Every formatted line is printed to
//! the devtools console and kept in a fixed-size circular buffer so the UI can
//! show the most recent entries.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Lines kept when the caller does not pick a capacity
pub const DEFAULT_CAPACITY: usize = 500;

static BUFFER: OnceLock<Arc<Mutex<LogBuffer>>> = OnceLock::new();

/// Circular buffer of formatted log lines
#[derive(Debug)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a line, dropping the oldest one when full
    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Snapshot, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// `MakeWriter` handing out one [`LineWriter`] per event
#[derive(Clone)]
pub struct ConsoleMakeWriter {
    buffer: Arc<Mutex<LogBuffer>>,
}

impl ConsoleMakeWriter {
    pub fn new(buffer: Arc<Mutex<LogBuffer>>) -> Self {
        Self { buffer }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter::new(Level::INFO, self.buffer.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        LineWriter::new(*meta.level(), self.buffer.clone())
    }
}

/// Collects one formatted event and flushes it on drop
pub struct LineWriter {
    level: Level,
    bytes: Vec<u8>,
    buffer: Arc<Mutex<LogBuffer>>,
}

impl LineWriter {
    fn new(level: Level, buffer: Arc<Mutex<LogBuffer>>) -> Self {
        Self {
            level,
            bytes: Vec::new(),
            buffer,
        }
    }
}

impl Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.bytes);
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }
        let line = format!("{} {}", chrono::Local::now().format("%H:%M:%S%.3f"), text);
        emit(self.level, &line);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(line);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    if level == Level::ERROR {
        web_sys::console::error_1(&value);
    } else if level == Level::WARN {
        web_sys::console::warn_1(&value);
    } else if level == Level::INFO {
        web_sys::console::info_1(&value);
    } else {
        web_sys::console::debug_1(&value);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Install the global subscriber. Call once at startup.
pub fn init_logger(
    app_name: &str,
    capacity: usize,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let buffer = BUFFER
        .get_or_init(|| Arc::new(Mutex::new(LogBuffer::new(capacity))))
        .clone();

    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter::new(buffer))
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(Level::DEBUG)
        .try_init()?;

    tracing::info!("{} logger ready (keeping {} lines)", app_name, capacity);
    Ok(())
}

/// Most recent lines captured since [`init_logger`], oldest first
pub fn recent_lines() -> Vec<String> {
    BUFFER
        .get()
        .and_then(|buffer| buffer.lock().ok().map(|b| b.lines()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_drops_oldest_when_full() {
        let mut buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.lines(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let mut buffer = LogBuffer::new(0);
        buffer.push("a".to_string());
        buffer.push("b".to_string());
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.lines(), vec!["b"]);
    }

    #[test]
    fn test_line_writer_flushes_on_drop() {
        let buffer = Arc::new(Mutex::new(LogBuffer::new(10)));
        let make = ConsoleMakeWriter::new(buffer.clone());
        {
            let mut writer = make.make_writer();
            writer.write_all(b"INFO compare finished\n").unwrap();
        }
        let lines = buffer.lock().unwrap().lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("INFO compare finished"));
    }

    #[test]
    fn test_empty_write_is_not_recorded() {
        let buffer = Arc::new(Mutex::new(LogBuffer::new(10)));
        let make = ConsoleMakeWriter::new(buffer.clone());
        drop(make.make_writer());
        assert!(buffer.lock().unwrap().is_empty());
    }

    #[test]
    fn test_init_captures_events() {
        init_logger("scancontroll-test", 10).unwrap();
        tracing::warn!("master image missing");
        assert!(recent_lines().iter().any(|l| l.contains("master image missing")));
    }
}
