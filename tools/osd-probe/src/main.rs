///
/// osd-probe - Platform layer diagnostics
///
/// Commands:
/// - osd-probe info: Timebase, processor count and capabilities
/// - osd-probe sleep --ms N: Request a sleep and report how long it took
/// - osd-probe wait --ms N: Time out on an unsignalled event and report the overshoot
///

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use osd_runtime::{
    Event, OsdError, OsdRuntime, Thread, TickClock, Timebase, duration_to_ticks, ticks_to_duration,
};

#[derive(Parser)]
#[command(name = "osd-probe")]
#[command(author, version, about = "Inspect the osd platform layer on this host", long_about = None)]
struct Cli {
    /// Config file (osd.toml); defaults apply when it does not exist
    #[arg(long, default_value = "osd.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print timebase, processor count and capabilities
    Info,

    /// Sleep through the tick clock and report the actual duration
    Sleep {
        /// Requested duration in milliseconds
        #[arg(long, default_value_t = 16)]
        ms: u64,
    },

    /// Time out on an event and report how late the wait returned
    Wait {
        /// Timeout in milliseconds
        #[arg(long, default_value_t = 50)]
        ms: u64,

        /// Number of waits to measure
        #[arg(long, default_value_t = 5)]
        rounds: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), OsdError> {
    let runtime = OsdRuntime::from_config_file(&cli.config)?;
    runtime.init_logging()?;
    tracing::debug!(config = ?runtime.config(), "loaded configuration");

    match cli.command {
        Commands::Info => print_info(&runtime),
        Commands::Sleep { ms } => measure_sleep(&runtime, ms),
        Commands::Wait { ms, rounds } => measure_wait(ms, rounds)?,
    }
    Ok(())
}

fn print_info(runtime: &OsdRuntime) {
    let timebase = Timebase::host();
    println!("ticks:            {}", TickClock::now());
    println!("ticks per second: {}", TickClock::ticks_per_second());
    println!("timebase:         {}/{}", timebase.numer, timebase.denom);
    println!("processors:       {}", runtime.cpu_count());
    println!("sleep margin:     {} ms", runtime.config().sleep_margin_ms);
    println!(
        "cpu affinity:     {}",
        if Thread::<()>::supports_affinity() { "supported" } else { "unsupported" }
    );
}

fn measure_sleep(runtime: &OsdRuntime, ms: u64) {
    let tps = TickClock::ticks_per_second();
    let request = duration_to_ticks(Duration::from_millis(ms), tps);
    let start = TickClock::now();
    runtime.sleep(request);
    let slept = ticks_to_duration(TickClock::elapsed_since(start), tps);
    println!("requested {} ms, slept {:.3} ms", ms, slept.as_secs_f64() * 1000.0);
}

fn measure_wait(ms: u64, rounds: u32) -> Result<(), OsdError> {
    let timeout = Duration::from_millis(ms);
    let ticks = duration_to_ticks(timeout, TickClock::ticks_per_second());

    // Measure from a worker so the numbers reflect a woken thread, not main.
    let worker = Thread::spawn(Event::manual_reset(false), move |event| {
        (0..rounds)
            .map(|_| {
                let start = Instant::now();
                let signalled = event.wait(ticks);
                (signalled, start.elapsed())
            })
            .collect::<Vec<_>>()
    })?;

    for (round, (signalled, elapsed)) in worker.join()?.into_iter().enumerate() {
        let overshoot = elapsed.saturating_sub(timeout);
        println!(
            "round {}: signalled={} elapsed={:.3} ms overshoot={:.3} ms",
            round + 1,
            signalled,
            elapsed.as_secs_f64() * 1000.0,
            overshoot.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}
