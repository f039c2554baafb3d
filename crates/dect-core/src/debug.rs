use core::fmt;
use std::sync::Once;
use std::fs::OpenOptions;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt as tracingfmt, EnvFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;


/// if `cond` is false, logs a warning with your message.
#[macro_export]
macro_rules! assert_warn {
    ($cond:expr, $($arg:tt)+) => {{
        if !$cond {
            tracing::warn!(
                target: module_path!(),
                "assertion warning: `{}` failed: {} at {}:{}",
                stringify!($cond),
                format_args!($($arg)+),
                file!(),
                line!(),
            );
        }
    }};
}

struct AlignedFormatter;

/// Visitor to extract the client field value
struct ClientVisitor {
    client: Option<String>,
}

impl tracing::field::Visit for ClientVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "client" {
            self.client = Some(format!("{:?}", value));
        }
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        if field.name() == "client" {
            self.client = Some(value.to_string());
        }
    }
}

/// Shortens a source path: "crates/dect-mac/src/mac_slot_mgr.rs" becomes "[mac] mac_slot_mgr.rs"
fn short_path(file_path: &str) -> String {
    match file_path.split_once("/src/") {
        Some((crate_dir, file)) => {
            let crate_dir = crate_dir.rsplit('/').next().unwrap_or(crate_dir);
            let crate_name = crate_dir.strip_prefix("dect-").unwrap_or(crate_dir);
            format!("[{}] {}", crate_name, file)
        }
        None => file_path.to_string(),
    }
}

impl<S, N> FormatEvent<S, N> for AlignedFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        
        // Extract client field if present, shown in a fixed-width column
        let mut visitor = ClientVisitor { client: None };
        event.record(&mut visitor);
        let has_client = visitor.client.is_some();
        let client_str = match visitor.client {
            Some(id) => format!("client {:<6}", id),
            None => " ".repeat(13),
        };
        
        // Add ANSI color codes for different log levels
        let (color_level, color_reset) = match *metadata.level() {
            tracing::Level::ERROR => ("\x1b[31m", "\x1b[0m"),
            tracing::Level::WARN => ("\x1b[33m", "\x1b[0m"),
            tracing::Level::INFO => ("\x1b[32m", "\x1b[0m"),
            tracing::Level::DEBUG => ("\x1b[34m", "\x1b[0m"),
            tracing::Level::TRACE => ("\x1b[35m", "\x1b[0m"),
        };
        
        let formatted_path = format!("{} {}", client_str, short_path(metadata.file().unwrap_or("unknown")));

        // Format: "LEVEL client [module] file:line: message"
        let location = format!(
            "{}{:<5}{} {}:{}:",
            color_level,
            metadata.level(),
            color_reset,
            formatted_path,
            metadata.line().unwrap_or(0)
        );
        
        
        // Capture the message
        let mut message_buf = String::new();
        let message_writer = format::Writer::new(&mut message_buf);
        ctx.field_format().format_fields(message_writer, event)?;
        
        // Remove the client field from the message, it is already shown in its own column
        if has_client {
            if let Some(client_idx) = message_buf.find("client=") {
                if let Some(space_idx) = message_buf[client_idx..].find(' ') {
                    message_buf.replace_range(client_idx..client_idx + space_idx + 1, "");
                } else {
                    message_buf.truncate(client_idx);
                }
            }
        }

        write!(writer, "{:<width$} {}", location, message_buf, width = 64)?;
        writeln!(writer)
    }
}

static INIT_LOG: Once = Once::new();

/// Sets up logging with maximum verbosity (trace level)
/// Mainly for unit tests
pub fn setup_logging_verbose() {

    let stdout_filter = EnvFilter::new("trace");

    setup_logging(stdout_filter, None);
}

/// Sets up default logging to stdout and optionally, a verbose log file
/// Returns a guard, that needs to be kept alive for logging to file to work
pub fn setup_logging_default(verbose_logfile: Option<String>) -> Option<WorkerGuard> {

    let stdout_filter = get_default_stdout_filter();
    let logfile_and_filter = if let Some(file) = verbose_logfile {
        Some((file, get_default_logfile_filter()))
    } else {
        None
    };
    setup_logging(stdout_filter, logfile_and_filter)
}    

pub fn get_default_stdout_filter() -> EnvFilter {

    EnvFilter::new("info")
        // Allocation decisions. No-op releases are debug and only go to the log file
        .add_directive("dect_core::slot_alloc=info".parse().unwrap())

        // Client admission and hand-offs to the PHY scheduler
        .add_directive("dect_mac=info".parse().unwrap())
        .add_directive("dect_slotmgr=info".parse().unwrap())
}


fn get_default_logfile_filter() -> EnvFilter {
    EnvFilter::new("debug")
}

/// Sets up logging to stdout and optionally, a verbose log file
/// If an output file  is requested, returns Some<WorkerGuard>. Keep this value alive
/// or logging to file may cease working. If no output file is provided, returns None. 
fn setup_logging(stdout_filter: EnvFilter, outfile: Option<(String, EnvFilter)>) -> Option<WorkerGuard> {

    // Setup logging with a verbose log file, if it can be opened
    let file = outfile.and_then(|(path, filter)| {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some((file, filter)),
            Err(e) => {
                eprintln!("Failed to open log file {}: {}, logging to stdout only", path, e);
                None
            }
        }
    });

    if let Some((file, outfile_filter)) = file {
        let (file_writer, guard) = tracing_appender::non_blocking(file);
        
        // Setup once
        INIT_LOG.call_once(||{
            let file_layer = tracingfmt::layer()
                .event_format(AlignedFormatter)
                .with_writer(file_writer)
                .with_ansi(false);

            // Change both here and below in the non-logfile variant.     
            let stdout_layer = tracingfmt::layer()
                .event_format(AlignedFormatter);
                
            tracing_subscriber::registry()
                .with(file_layer.with_filter(outfile_filter))
                .with(stdout_layer.with_filter(stdout_filter))
                .init();
        });

        Some(guard)
    } else {
        // Setup once
        INIT_LOG.call_once(||{
            
            // Change both here and below in the non-logfile variant.     
            let stdout_layer = tracingfmt::layer()
                .event_format(AlignedFormatter);
                
            tracing_subscriber::registry()
                .with(stdout_layer.with_filter(stdout_filter))
                .init();
        });
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_path() {
        assert_eq!(short_path("crates/dect-mac/src/mac_slot_mgr.rs"), "[mac] mac_slot_mgr.rs");
        assert_eq!(short_path("bins/dect-slotmgr/src/main.rs"), "[slotmgr] main.rs");
        assert_eq!(short_path("crates/dect-mac/tests/test_mac_slot_mgr.rs"), "crates/dect-mac/tests/test_mac_slot_mgr.rs");
    }
}
