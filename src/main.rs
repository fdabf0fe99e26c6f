use clap::Parser;
use log_tail::{Config, DEFAULT_BUFFER_SIZE, FileWatcher, WakeSignal, follow};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "log-tail", about = "Follow a log file across truncation and rotation")]
struct Cli {
    /// File to follow
    path: PathBuf,

    /// Print the existing content first instead of starting at the end
    #[arg(long)]
    from_start: bool,

    /// Milliseconds between rereads once the file is exhausted
    #[arg(long, default_value_t = 100)]
    poll_interval_ms: u64,

    /// Read buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Also reread on filesystem notifications, not only on the poll interval
    #[arg(long)]
    watch: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("LOG_TAIL_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::new()
        .with_start_from_beginning(cli.from_start)
        .with_poll_interval(Duration::from_millis(cli.poll_interval_ms))
        .with_buffer_size(cli.buffer_size);

    // Kept alive for the whole run; dropping it stops the notifications.
    let _watcher = if cli.watch {
        let wake = WakeSignal::new();
        match FileWatcher::new(&cli.path, wake.clone()) {
            Ok(watcher) => {
                config = config.with_wake(wake);
                Some(watcher)
            }
            Err(e) => {
                tracing::warn!(error = %e, "file notifications unavailable, polling only");
                None
            }
        }
    } else {
        None
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("interrupted, stopping");
                on_signal.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "cannot listen for Ctrl-C"),
        }
    });

    let mut tailer = match follow(&cancel, &cli.path, config).await {
        Ok(tailer) => tailer,
        Err(e) => {
            eprintln!("Error setting up tailer: {}", e);
            process::exit(1);
        }
    };

    tracing::info!(path = %cli.path.display(), "following file");
    while let Some(line) = tailer.next().await {
        println!("{}", line);
    }

    tailer.done().await;
    if let Some(e) = tailer.err() {
        eprintln!("Error reading file: {}", e);
        process::exit(1);
    }
}
