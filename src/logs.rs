use std::io::{self, IsTerminal};

use anyhow::{bail, Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::config::CommonConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogsConfig {
    #[serde(default = "LogsConfig::default_level")]
    pub level: String,
}

impl CommonConfig for LogsConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }

    fn complete(&mut self) -> Result<()> {
        self.level = self.level.trim().to_lowercase();
        parse_level(&self.level)?;
        Ok(())
    }
}

impl LogsConfig {
    pub fn default_level() -> String {
        String::from("info")
    }

    pub fn init(&self, target: LogTarget) -> Result<()> {
        self.dispatch(target.is_terminal())?
            .chain(target.output())
            .apply()
            .context("init logger")?;
        Ok(())
    }

    fn dispatch(&self, is_terminal: bool) -> Result<fern::Dispatch> {
        let level = parse_level(&self.level)?;

        let colors = ColoredLevelConfig::new()
            .info(Color::Green)
            .warn(Color::Yellow)
            .debug(Color::Magenta);

        Ok(fern::Dispatch::new()
            .format(move |out, message, record| {
                if is_terminal {
                    out.finish(format_args!(
                        "{} [{}] {}",
                        humantime::format_rfc3339_millis(std::time::SystemTime::now()),
                        colors.color(record.level()),
                        message
                    ))
                } else {
                    out.finish(format_args!(
                        "{} [{}] {}",
                        humantime::format_rfc3339_millis(std::time::SystemTime::now()),
                        record.level(),
                        message
                    ))
                }
            })
            .level(level)
            // The AWS SDK is chatty at info.
            .level_for("aws_config", LevelFilter::Warn)
            .level_for("aws_smithy_runtime", LevelFilter::Warn))
    }
}

/// Where log lines go. Commands that print results on stdout log to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

impl LogTarget {
    fn is_terminal(self) -> bool {
        match self {
            Self::Stdout => io::stdout().is_terminal(),
            Self::Stderr => io::stderr().is_terminal(),
        }
    }

    fn output(self) -> fern::Output {
        match self {
            Self::Stdout => io::stdout().into(),
            Self::Stderr => io::stderr().into(),
        }
    }
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    Ok(match level {
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        _ => bail!("unknown log level '{}'", level),
    })
}
