//! Per-job logger with file and callback output.
//!
//! Each job gets its own logger that:
//! - Writes to a dedicated log file
//! - Mirrors messages into `tracing` so the console shows progress
//! - Sends messages to a UI callback (if provided)
//! - Keeps a tail buffer of tool output for error diagnosis

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use super::types::{GuiLogCallback, LogConfig, LogLevel, MessagePrefix};

/// Per-job logger with dual output (file + UI).
pub struct JobLogger {
    /// Job name for identification.
    job_name: String,
    /// Path to log file.
    log_path: PathBuf,
    /// File writer (buffered).
    file_writer: Arc<Mutex<Option<BufWriter<File>>>>,
    /// UI callback for sending messages.
    gui_callback: Arc<Mutex<Option<GuiLogCallback>>>,
    /// Logging configuration.
    config: LogConfig,
    /// Recent tool output lines.
    tail_buffer: Arc<Mutex<VecDeque<String>>>,
}

impl JobLogger {
    /// Create a new job logger.
    ///
    /// # Arguments
    /// * `job_name` - Name of the job (used in log filename)
    /// * `log_dir` - Directory to write log file to
    /// * `config` - Logging configuration
    /// * `gui_callback` - Optional callback for UI output
    pub fn new(
        job_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        gui_callback: Option<GuiLogCallback>,
    ) -> std::io::Result<Self> {
        let job_name = job_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&job_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            job_name,
            log_path,
            file_writer: Arc::new(Mutex::new(Some(BufWriter::new(file)))),
            gui_callback: Arc::new(Mutex::new(gui_callback)),
            tail_buffer: Arc::new(Mutex::new(VecDeque::with_capacity(config.error_tail))),
            config,
        })
    }

    /// Get the job name.
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Get the log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }

        match level {
            LogLevel::Trace => tracing::trace!(job = %self.job_name, "{}", message),
            LogLevel::Debug => tracing::debug!(job = %self.job_name, "{}", message),
            LogLevel::Info => tracing::info!(job = %self.job_name, "{}", message),
            LogLevel::Warn => tracing::warn!(job = %self.job_name, "{}", message),
            LogLevel::Error => tracing::error!(job = %self.job_name, "{}", message),
        }

        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        let msg = MessagePrefix::Warning.format(message);
        self.log(LogLevel::Warn, &msg);
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        let msg = MessagePrefix::Error.format(message);
        self.log(LogLevel::Error, &msg);
    }

    /// Log a command being executed.
    pub fn command(&self, command: &str) {
        let msg = MessagePrefix::Command.format(command);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a phase marker.
    pub fn phase(&self, phase_name: &str) {
        let msg = MessagePrefix::Phase.format(phase_name);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        let msg = MessagePrefix::Success.format(message);
        self.log(LogLevel::Info, &msg);
    }

    /// Record one line of external tool output.
    ///
    /// In compact mode, lines only land in the tail buffer.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        {
            let mut buffer = self.tail_buffer.lock();
            if self.config.error_tail > 0 && buffer.len() >= self.config.error_tail {
                buffer.pop_front();
            }
            if self.config.error_tail > 0 {
                buffer.push_back(line.to_string());
            }
        }

        if self.config.compact {
            return;
        }

        let prefix = if is_stderr { "[stderr] " } else { "" };
        let msg = format!("{}{}", prefix, line);
        self.output(&self.format_message(&msg));
    }

    /// Show the tail buffer (typically after an error).
    pub fn show_tail(&self, header: &str) {
        let buffer = self.tail_buffer.lock();
        if buffer.is_empty() {
            return;
        }

        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in buffer.iter() {
            tracing::error!(job = %self.job_name, "  {}", line);
            self.output(&self.format_message(line));
        }
    }

    /// Clear the tail buffer.
    pub fn clear_tail(&self) {
        self.tail_buffer.lock().clear();
    }

    /// Get the current tail buffer contents.
    pub fn get_tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    /// Flush the log file.
    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Close the logger and release resources.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }

        if let Some(ref callback) = *self.gui_callback.lock() {
            callback(formatted);
        }
    }
}

impl Drop for JobLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sanitize a string to be safe for use as a filename.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Builder for creating JobLogger with fluent API.
pub struct JobLoggerBuilder {
    job_name: String,
    log_dir: PathBuf,
    config: LogConfig,
    gui_callback: Option<GuiLogCallback>,
}

impl JobLoggerBuilder {
    /// Create a new builder.
    pub fn new(job_name: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            job_name: job_name.into(),
            log_dir: log_dir.into(),
            config: LogConfig::default(),
            gui_callback: None,
        }
    }

    /// Set the logging configuration.
    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the log level.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Enable or disable compact mode.
    pub fn compact(mut self, compact: bool) -> Self {
        self.config.compact = compact;
        self
    }

    /// Set the UI callback.
    pub fn gui_callback(mut self, callback: GuiLogCallback) -> Self {
        self.gui_callback = Some(callback);
        self
    }

    /// Build the JobLogger.
    pub fn build(self) -> std::io::Result<JobLogger> {
        JobLogger::new(self.job_name, self.log_dir, self.config, self.gui_callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn creates_log_file() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("clip", dir.path(), LogConfig::default(), None).unwrap();

        assert!(logger.log_path().exists());
        assert!(logger.log_path().to_string_lossy().contains("clip.log"));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("clip", dir.path(), LogConfig::default(), None).unwrap();

        logger.info("Converting video");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("Converting video"));
    }

    #[test]
    fn calls_gui_callback() {
        let dir = tempdir().unwrap();
        let call_count = Arc::new(AtomicUsize::new(0));
        let count_clone = call_count.clone();

        let callback: GuiLogCallback = Box::new(move |_msg| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        let logger =
            JobLogger::new("clip", dir.path(), LogConfig::default(), Some(callback)).unwrap();

        logger.info("Message 1");
        logger.error("Message 2");
        logger.debug("filtered at info level");

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn compact_mode_keeps_output_out_of_file() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("clip", dir.path(), LogConfig::default(), None).unwrap();

        logger.output_line("frame=  120 fps= 30", true);
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(!content.contains("frame="));
        assert_eq!(logger.get_tail(), vec!["frame=  120 fps= 30".to_string()]);
    }

    #[test]
    fn tail_buffer_maintains_limit() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            error_tail: 5,
            ..LogConfig::default()
        };

        let logger = JobLogger::new("clip", dir.path(), config, None).unwrap();

        for i in 0..10 {
            logger.output_line(&format!("Line {}", i), false);
        }

        let tail = logger.get_tail();
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0], "Line 5");
        assert_eq!(tail[4], "Line 9");

        logger.clear_tail();
        assert!(logger.get_tail().is_empty());
    }

    #[test]
    fn builder_applies_options() {
        let dir = tempdir().unwrap();
        let logger = JobLoggerBuilder::new("built", dir.path())
            .level(LogLevel::Debug)
            .compact(false)
            .build()
            .unwrap();

        logger.debug("visible at debug");
        logger.output_line("tool says hi", false);
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("visible at debug"));
        assert!(content.contains("tool says hi"));
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("normal_name"), "normal_name");
        assert_eq!(sanitize_filename("has/slash"), "has_slash");
        assert_eq!(sanitize_filename("has:colon"), "has_colon");
        assert_eq!(sanitize_filename("a<b>c"), "a_b_c");
    }
}
