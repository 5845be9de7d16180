use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::Parser;

use howl::{available_activities, ActivityHost, HostConfig};
use howl_core::Pulse;

/// Runs howl activities at a fixed tick rate and prints one pulse per line
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Activity to start with (see --list); a random one when omitted
    #[arg(short, long)]
    activity: Option<String>,

    /// Ticks per second
    #[arg(short, long, default_value_t = 20.0)]
    rate: f64,

    /// Seconds of output to produce
    #[arg(short, long, default_value_t = 10.0)]
    seconds: f64,

    /// Seed for every random choice
    #[arg(long, default_value_t = HostConfig::default().seed)]
    seed: u64,

    /// Weight for automatic activity changes (0 disables them)
    #[arg(short = 'p', long, default_value_t = HostConfig::default().activity_change_probability)]
    change_probability: f64,

    /// Pace ticks in wall-clock time instead of running as fast as possible
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// List the available activities and exit
    #[arg(long, default_value_t = false)]
    list: bool,
}

fn print_activities() {
    for info in available_activities() {
        let random = if info.randomly_select { "" } else { " (manual only)" };
        println!("{:<14} {}{}", info.name, info.display_name, random);
    }
}

fn format_pulse(time: f64, pulse: &Pulse) -> String {
    format!(
        "{time:9.3}  A {:.3} @ {:.3}  B {:.3} @ {:.3}",
        pulse.amp_a, pulse.freq_a, pulse.amp_b, pulse.freq_b
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list {
        print_activities();
        return Ok(());
    }
    if !(args.rate.is_finite() && args.rate > 0.0) {
        bail!("tick rate must be a positive number of ticks per second, got {}", args.rate);
    }
    if !(0.0..=1.0).contains(&args.change_probability) {
        bail!("change probability must be within [0, 1], got {}", args.change_probability);
    }

    let mut host = ActivityHost::new(HostConfig {
        activity_change_probability: args.change_probability,
        seed: args.seed,
    });
    match args.activity.as_deref() {
        Some(name) => host
            .set_activity_by_name(name)
            .context("use --list to see the available activities")?,
        None => host.change_activity(),
    }

    let period = 1.0 / args.rate;
    let ticks = (args.seconds.max(0.0) * args.rate).round() as u64;
    log::info!("running {ticks} ticks at {} Hz", args.rate);

    let start = Instant::now();
    for tick in 0..=ticks {
        let time = tick as f64 * period;
        if args.realtime {
            let due = Duration::from_secs_f64(time);
            if let Some(wait) = due.checked_sub(start.elapsed()) {
                thread::sleep(wait);
            }
        }
        host.update_state(time);
        let pulse = host.pulse_at_time(time).clamped();
        println!("{}", format_pulse(time, &pulse));
    }
    Ok(())
}
