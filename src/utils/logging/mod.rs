//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_DATA_DIR: directory for log files; default is "logs/"

pub mod error;

use chrono::Utc;
use std::{env, fs::create_dir_all, path::Path, sync::OnceLock};
use tracing::{info, Subscriber};
use tracing_subscriber::{
	filter::EnvFilter,
	fmt::{
		self,
		format::Writer,
		{FmtContext, FormatEvent, FormatFields},
	},
	prelude::*,
	registry::LookupSpan,
};

/// Base name of the log file written in file mode
const LOG_FILE_PREFIX: &str = "receipt-watcher";

/// Formatter wrapper that strips ANSI escape codes before writing
struct StripAnsiFormatter<T> {
	inner: T,
}

impl<T> StripAnsiFormatter<T> {
	fn new(inner: T) -> Self {
		Self { inner }
	}
}

impl<S, N, T> FormatEvent<S, N> for StripAnsiFormatter<T>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	T: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		let mut buf = String::new();
		self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
		write!(writer, "{}", strip_ansi_escapes(&buf))
	}
}

fn ansi_regex() -> &'static regex::Regex {
	static RE: OnceLock<regex::Regex> = OnceLock::new();
	RE.get_or_init(|| {
		regex::Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("ANSI escape pattern is a valid regex")
	})
}

/// Strips ANSI escape codes from a string
fn strip_ansi_escapes(s: &str) -> String {
	ansi_regex().replace_all(s, "").to_string()
}

/// Path of the daily log file inside `log_dir`
pub fn compute_log_file_path(log_dir: &str, date_str: &str) -> String {
	format!(
		"{}/{}-{}.log",
		log_dir.trim_end_matches('/'),
		LOG_FILE_PREFIX,
		date_str
	)
}

/// Maps a `LOG_LEVEL` value to a tracing level, defaulting to INFO
pub fn parse_log_level(value: &str) -> tracing::Level {
	match value.to_lowercase().as_str() {
		"trace" => tracing::Level::TRACE,
		"debug" => tracing::Level::DEBUG,
		"warn" => tracing::Level::WARN,
		"error" => tracing::Level::ERROR,
		_ => tracing::Level::INFO,
	}
}

fn create_log_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

/// Sets up logging by reading configuration from environment variables.
///
/// `level_override` takes precedence over `LOG_LEVEL` when set (the CLI flag).
pub fn setup_logging(level_override: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
	let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
	let log_level = level_override
		.map(str::to_string)
		.unwrap_or_else(|| env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
	let level_filter = parse_log_level(&log_level);

	let with_ansi = log_mode.to_lowercase() != "file";
	let format = create_log_format(with_ansi);
	let subscriber = tracing_subscriber::registry().with(EnvFilter::new(level_filter.to_string()));

	if log_mode.to_lowercase() == "file" {
		let log_dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs/".to_string());
		let date_str = Utc::now().format("%Y-%m-%d").to_string();
		let final_path = compute_log_file_path(&log_dir, &date_str);

		let parent = Path::new(&final_path).parent().unwrap_or(Path::new("."));
		create_dir_all(parent)?;

		let file_appender = tracing_appender::rolling::never(
			parent,
			Path::new(&final_path).file_name().unwrap_or_default(),
		);

		subscriber
			.with(
				fmt::layer()
					.event_format(StripAnsiFormatter::new(format))
					.with_writer(file_appender)
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.try_init()?;
	} else {
		subscriber
			.with(
				fmt::layer()
					.event_format(format)
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.try_init()?;
	}

	info!("Logging is successfully configured (mode: {})", log_mode);
	Ok(())
}
