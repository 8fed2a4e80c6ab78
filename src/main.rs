mod config;
mod countdown;
mod engine;
mod provider;
mod state;

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use config::Config;
use countdown::NextBoundary;
use engine::{Engine, Snapshot, Tick};
use provider::AnchorProvider;

/// Parse command line arguments
struct Args {
    once: bool,
    validate: bool,
    help: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args {
        once: false,
        validate: false,
        help: false,
    };

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--once" => result.once = true,
            "--validate" => result.validate = true,
            "--help" | "-h" => result.help = true,
            _ => {}
        }
    }

    result
}

fn print_help() {
    println!("Imsakiye - iftar/sahur and end-of-workday countdown\n");
    println!("USAGE:");
    println!("    imsakiye [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    --once              Fetch today's times, print one snapshot, exit");
    println!("    --validate          Validate configuration and exit");
    println!("    --help, -h          Show this help message\n");
    println!("ENVIRONMENT:");
    println!("    CITY, COUNTRY, CALC_METHOD, TIMEZONE, WORK_END,");
    println!("    FETCH_TIMEOUT_SECS, RETRY_INTERVAL_SECS, API_BASE_URL");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    if args.help {
        print_help();
        return Ok(());
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("imsakiye=info".parse().unwrap()),
        )
        .init();

    info!("Imsakiye v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!("  Location: {}, {}", config.city, config.country);
    info!("  Timezone: {}", config.timezone);
    info!("  Work end: {}", config.work_end);
    info!("  Retry interval: {}s", config.retry_interval_secs);

    // Handle --validate mode
    if args.validate {
        info!("Validating configuration...");
        match config.validate() {
            Ok(()) => {
                info!("Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    let config = Arc::new(config);
    let provider = AnchorProvider::new(&config)?;
    let engine = Arc::new(Engine::new(config, provider));

    // First fetch; no countdown runs before it settles.
    engine.fetch_once().await;

    if args.once {
        match engine.tick() {
            Tick::Counting(snapshot) => {
                print_snapshot(&snapshot);
                return Ok(());
            }
            Tick::Error(reason) => {
                error!("Prayer times unavailable: {}", reason);
                std::process::exit(1);
            }
            Tick::Loading => {
                error!("Fetch did not settle");
                std::process::exit(1);
            }
        }
    }

    let cancel = CancellationToken::new();

    let retry_engine = engine.clone();
    let retry_cancel = cancel.clone();
    let retry_handle = tokio::spawn(async move {
        retry_engine.run_retry_loop(retry_cancel).await;
    });

    let tick_engine = engine.clone();
    let tick_cancel = cancel.clone();
    let tick_handle = tokio::spawn(async move {
        tick_engine.run_tick_loop(tick_cancel, render_tick).await;
    });

    tokio::signal::ctrl_c().await?;
    println!();
    info!("Shutting down");
    cancel.cancel();
    let _ = retry_handle.await;
    let _ = tick_handle.await;

    Ok(())
}

fn render_tick(tick: Tick) {
    match tick {
        Tick::Loading => print_status("Yükleniyor..."),
        Tick::Error(reason) => print_status(&format!("Bağlantı hatası: {}", reason)),
        Tick::Counting(snapshot) => {
            let label = match snapshot.state.next_boundary {
                NextBoundary::Iftar => "İftara kalan",
                NextBoundary::Sahur => "Sahura kalan",
            };
            print_status(&format!(
                "{}: {}  |  Mesai bitimine: {}  (iftar {} / sahur {})",
                label,
                snapshot.observance_countdown,
                snapshot.work_countdown,
                snapshot.anchors.iftar.format("%H:%M"),
                snapshot.anchors.sahur.format("%H:%M"),
            ));
        }
    }
}

/// Rewrite a single terminal line in place; padded to clear leftovers
/// from a longer previous frame.
fn print_status(line: &str) {
    print!("\r{:<100}", line);
    let _ = std::io::stdout().flush();
}

fn print_snapshot(snapshot: &Snapshot) {
    let label = match snapshot.state.next_boundary {
        NextBoundary::Iftar => "iftar",
        NextBoundary::Sahur => "sahur",
    };
    println!("Date:              {}", snapshot.date.format("%d.%m.%Y"));
    println!("Sahur:             {}", snapshot.anchors.sahur.format("%H:%M"));
    println!("Iftar:             {}", snapshot.anchors.iftar.format("%H:%M"));
    println!("Next boundary:     {}", label);
    println!("Time remaining:    {}", snapshot.observance_countdown);
    println!("Until end of work: {}", snapshot.work_countdown);
}
