// src/logging.rs
//! Tracing output as GitHub workflow commands

use std::fmt::{self, Write as _};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::utils::escape_command_data;

/// Errors become `::error::`, warnings `::warning::`, debug and trace
/// `::debug::`. Info lines are printed as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowCommandFormat;

impl WorkflowCommandFormat {
    pub fn render(level: Level, message: &str) -> String {
        match level {
            Level::ERROR => format!("::error::{}", escape_command_data(message)),
            Level::WARN => format!("::warning::{}", escape_command_data(message)),
            Level::INFO => message.to_string(),
            _ => format!("::debug::{}", escape_command_data(message)),
        }
    }
}

impl<S, N> FormatEvent<S, N> for WorkflowCommandFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = String::new();
        ctx.format_fields(format::Writer::new(&mut message), event)?;
        writeln!(
            writer,
            "{}",
            Self::render(*event.metadata().level(), &message)
        )
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the debug input.
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level))
        // Keep the HTTP stack quiet even in debug mode
        .add_directive("hyper=warn".parse().expect("Invalid log directive"))
        .add_directive("reqwest=info".parse().expect("Invalid log directive"));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(WorkflowCommandFormat)
                .with_writer(std::io::stdout),
        )
        .with(filter)
        .try_init();
}
