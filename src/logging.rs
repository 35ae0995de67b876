use std::sync::Mutex;

use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter, Registry};

lazy_static! {
    static ref LOG_INITIALIZED: Mutex<bool> = Mutex::new(false);
}

/// Initialize logging.  Nothing is emitted unless the environment variable
/// `RUST_LOG` is set to a non-empty value, in which case it's interpreted as
/// an `EnvFilter` (e.g. `RUST_LOG=frame_hierarchy=trace` to watch every
/// insertion).  Safe to call more than once; only the first call does anything.
pub fn init_logging() {
    let mut initialized = match LOG_INITIALIZED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if *initialized {
        return;
    }
    *initialized = true;

    // Scripts frequently set RUST_LOG unconditionally but potentially with an
    // empty value, and we don't want that to be interpreted as a desire to
    // enable logging.
    let rustlog = match std::env::var("RUST_LOG") {
        Ok(rustlog) if !rustlog.is_empty() => rustlog,
        _ => return,
    };
    let env_filter = match EnvFilter::try_new(&rustlog) {
        Ok(env_filter) => env_filter,
        Err(err) => {
            eprintln!("Ignoring unparseable RUST_LOG {:?}: {}", rustlog, err);
            return;
        }
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .compact()
        // Output usually ends up in a log file or gets diffed, so ANSI isn't
        // helpful.
        .with_ansi(false)
        // Wall time takes up a lot of columns and makes logs undiffable.
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    // Tests call this too and may race a subscriber someone else installed.
    let _ = Registry::default().with(layer).try_init();
}
