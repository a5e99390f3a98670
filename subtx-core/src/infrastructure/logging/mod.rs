//! Logging infrastructure using `log` + `log4rs`.
//!
//! Whitelist filtering: the root logger defaults to OFF so third-party
//! crates stay quiet; our own crate is enabled at the requested level, and
//! callers opt in to specific modules via `<crate>=<level>` entries (or all
//! of them via `root=<level>`).

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::PathBuf;

const CONSOLE_APPENDER: &str = "stderr";
const LOG_FILE_APPENDER: &str = "log_file";
const LOG_FILE_NAME: &str = "subtx.log";
const LOG_LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {m}{n}";

const WHITELISTED_CRATES: &[&str] = &["subtx_core"];

/// Initializes the global logger with optional file output.
///
/// The logger is global; repeated calls are ignored. Console output goes to
/// stderr.
pub fn init_logger(log_dir: Option<&str>, filters: &str) {
    let app_level = parse_app_level(filters);
    let root_level = parse_root_override(filters).unwrap_or(LevelFilter::Off);
    let module_levels = parse_module_levels(filters);

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))
        .build();

    let mut config_builder = Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
    let mut root_appenders: Vec<&str> = vec![CONSOLE_APPENDER];

    if let Some(dir) = log_dir.filter(|dir| !dir.trim().is_empty()) {
        let log_path = PathBuf::from(dir.trim()).join(LOG_FILE_NAME);
        if let Ok(file_appender) = FileAppender::builder().encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN))).build(log_path) {
            config_builder = config_builder.appender(Appender::builder().build(LOG_FILE_APPENDER, Box::new(file_appender)));
            root_appenders.push(LOG_FILE_APPENDER);
        }
    }

    let appender_names: Vec<String> = root_appenders.iter().map(|name| (*name).to_string()).collect();

    for crate_name in WHITELISTED_CRATES {
        if !module_levels.iter().any(|(module, _)| module == *crate_name) {
            config_builder = config_builder
                .logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(*crate_name, app_level));
        }
    }

    for (module, level) in module_levels {
        config_builder =
            config_builder.logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(module, level));
    }

    if let Ok(config) = config_builder.build(Root::builder().appenders(root_appenders).build(root_level)) {
        let _ = log4rs::init_config(config);
    }
}

fn parse_app_level(filters: &str) -> LevelFilter {
    for part in filters.split(',') {
        let part = part.trim();
        if part.is_empty() || part.contains('=') {
            continue;
        }
        if let Ok(level) = part.parse() {
            return level;
        }
    }
    LevelFilter::Info
}

fn parse_root_override(filters: &str) -> Option<LevelFilter> {
    parse_module_entries(filters).into_iter().find(|(module, _)| module == "root").map(|(_, level)| level)
}

fn parse_module_levels(filters: &str) -> Vec<(String, LevelFilter)> {
    parse_module_entries(filters).into_iter().filter(|(module, _)| module != "root").collect()
}

fn parse_module_entries(filters: &str) -> Vec<(String, LevelFilter)> {
    let mut result = Vec::new();
    for part in filters.split(',') {
        let Some((module, level_str)) = part.trim().split_once('=') else {
            continue;
        };
        let module = module.trim();
        let level_str = level_str.trim();
        if module.is_empty() || level_str.is_empty() {
            continue;
        }
        if let Ok(level) = level_str.parse() {
            result.push((module.to_string(), level));
        }
    }
    result
}
