use super::components::InputCmd;
use super::plats::{PlatKind, Plats};
use super::player::{PlayerConfig, PlayerState};
use crate::world::Level;
use std::time::{Duration, Instant};

pub const SIM_FPS: u32 = 35;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Owns the level, the player and the thinkers, and drives them one tic at
/// a time.
pub struct TicRunner {
    level: Level,
    player: PlayerState,
    plats: Plats,
    level_time: u32,
    last: Instant,
}

impl TicRunner {
    pub fn new(level: Level, config: PlayerConfig) -> Self {
        let player = PlayerState::spawn(&level, config);
        Self {
            level,
            player,
            plats: Plats::new(),
            level_time: 0,
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[inline]
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    #[inline]
    pub fn plats(&self) -> &Plats {
        &self.plats
    }

    /// Tics run since the level started.
    #[inline]
    pub fn level_time(&self) -> u32 {
        self.level_time
    }

    /// Trigger a platform on every sector tagged `tag`.
    pub fn ev_do_plat(&mut self, tag: i16, kind: PlatKind) -> bool {
        self.plats.ev_do_plat(&self.level, tag, kind)
    }

    pub fn ev_stop_plat(&mut self, tag: i16) {
        self.plats.ev_stop_plat(tag);
    }

    /// Run one fixed-rate game tic: player first, then thinkers.
    pub fn tick(&mut self, cmd: InputCmd) {
        self.player.tick(&self.level, cmd, self.level_time);
        self.plats.run(&mut self.level);
        self.level_time = self.level_time.wrapping_add(1);
    }

    /// Advance enough tics to synchronise simulation with real time, all
    /// fed the same command.  Returns how many ran.
    pub fn pump(&mut self, cmd: InputCmd) -> u32 {
        let mut ran = 0;
        while self.last.elapsed() >= TIC {
            self.tick(cmd);
            self.last += TIC;
            ran += 1;
        }
        ran
    }
}
