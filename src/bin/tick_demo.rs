//! tick_demo - run the simulation headless on a generated row of rooms and
//! print the player and sector state as it goes.
//!
//! USAGE:
//! ```bash
//! cargo run --bin tick_demo -- \
//!     --room 0:128 --room 64:192 \
//!     --input "FORWARD*40,TURN_LEFT+RUN*10,FORWARD+RUN*30" \
//!     --lift 2 --every 5
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use simplelog::TermLogger;

use doomtic::{
    sim::{Buttons, InputCmd, PlatKind, PlayerConfig, TicRunner},
    world::sample::row_of_rooms,
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Room as `FLOOR:CEILING`, west to east.  Repeat for more rooms.
    #[arg(long = "room", value_name = "FLOOR:CEIL", value_parser = parse_room,
          default_values = ["0:128", "64:192", "24:160"])]
    rooms: Vec<(i32, i32)>,

    /// Comma separated `BUTTON[+BUTTON]*TICS` steps, e.g. `FORWARD+RUN*20`
    #[arg(long, default_value = "FORWARD*35")]
    input: String,

    /// Extra idle tics after the input script
    #[arg(long, default_value_t = 0)]
    idle: u32,

    /// Hold RUN for every step
    #[arg(long)]
    run: bool,

    /// Start a lift on this sector tag before the first tic
    #[arg(long, value_name = "TAG")]
    lift: Option<i16>,

    /// Lift kind: `lift`, `blaze` or `perpetual`
    #[arg(long, default_value = "lift", value_parser = parse_kind)]
    kind: PlatKind,

    /// Enable view bobbing
    #[arg(long)]
    bob: bool,

    /// Print state every N tics
    #[arg(long, default_value_t = 1)]
    every: u32,

    /// Pace tics at 35 Hz instead of running flat out
    #[arg(long)]
    realtime: bool,

    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

fn parse_room(s: &str) -> Result<(i32, i32)> {
    let (floor, ceil) = s
        .split_once(':')
        .with_context(|| format!("room `{s}` is not FLOOR:CEIL"))?;
    let floor: i32 = floor.trim().parse()?;
    let ceil: i32 = ceil.trim().parse()?;
    if ceil < floor {
        bail!("room `{s}` has its ceiling below the floor");
    }
    Ok((floor, ceil))
}

fn parse_kind(s: &str) -> Result<PlatKind> {
    Ok(match s {
        "lift" => PlatKind::DownWaitUpStay,
        "blaze" => PlatKind::BlazeDownWaitUpStay,
        "perpetual" => PlatKind::PerpetualRaise,
        other => bail!("unknown lift kind `{other}`"),
    })
}

/// `FORWARD+RUN*20,TURN_LEFT*4` → [(FORWARD|RUN, 20), (TURN_LEFT, 4)]
fn parse_script(script: &str) -> Result<Vec<(Buttons, u32)>> {
    let mut steps = Vec::new();
    for step in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (names, tics) = match step.split_once('*') {
            Some((names, tics)) => (names, tics.trim().parse()?),
            None => (step, 1),
        };
        let mut buttons = Buttons::empty();
        for name in names.split('+').map(str::trim) {
            if name.eq_ignore_ascii_case("IDLE") {
                continue;
            }
            buttons |= Buttons::from_name(&name.to_ascii_uppercase())
                .with_context(|| format!("unknown button `{name}`"))?;
        }
        steps.push((buttons, tics));
    }
    Ok(steps)
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    TermLogger::init(
        opts.log_level,
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Off)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut script = parse_script(&opts.input)?;
    script.push((Buttons::empty(), opts.idle));

    let level = row_of_rooms(&opts.rooms)?;
    info!(
        "{}: {} sectors, {} lines",
        level.name,
        level.sectors.len(),
        level.linedefs.len()
    );

    let config = PlayerConfig {
        bob: opts.bob,
        ..PlayerConfig::default()
    };
    let mut sim = TicRunner::new(level, config);

    if let Some(tag) = opts.lift {
        if !sim.ev_do_plat(tag, opts.kind) {
            info!("no sector with tag {tag} took a lift");
        }
    }

    let every = opts.every.max(1);
    for (buttons, tics) in script {
        let mut buttons = buttons;
        if opts.run {
            buttons |= Buttons::RUN;
        }
        let cmd = InputCmd::new(buttons);

        if opts.realtime {
            // pump may overshoot by a tic or two when the host stalls
            let mut left = tics;
            while left > 0 {
                let ran = sim.pump(cmd);
                if ran > 0 {
                    left = left.saturating_sub(ran);
                    report(&sim);
                }
                std::thread::sleep(std::time::Duration::from_millis(2));
            }
        } else {
            for _ in 0..tics {
                sim.tick(cmd);
                if sim.level_time() % every == 0 {
                    report(&sim);
                }
            }
        }
    }

    report(&sim);
    Ok(())
}

fn report(sim: &TicRunner) {
    let p = sim.player();
    let floors: Vec<i32> = sim.level().sectors.iter().map(|s| s.floor_h).collect();
    println!(
        "tic {:5}  pos ({}, {}) z {}  viewz {}  ang {:6.1}  mom ({}, {})  sector {}  {:?}  floors {:?}",
        sim.level_time(),
        p.x,
        p.y,
        p.z,
        p.viewz,
        p.angle.to_degrees(),
        p.momx,
        p.momy,
        p.sector,
        p.last_move,
        floors,
    );
}
