//! Platform movement thinker: lower, wait, raise.  One-shot lifts stop
//! at the top; perpetual ones cycle until put in stasis.
//!
//! Doom source name `p_plats`

use log::{debug, info};

use crate::world::{Level, SectorId};

use super::tic::SIM_FPS;

/// Base lift speed, map units per tic.
pub const PLATSPEED: i32 = 1;
/// Seconds spent at each end.
pub const PLATWAIT: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatStatus {
    Up,
    Down,
    Waiting,
    InStasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatKind {
    /// Cycles between the lowest and highest neighbouring floor forever.
    PerpetualRaise,
    /// Lift: down, wait, back up, done.
    DownWaitUpStay,
    /// Same as `DownWaitUpStay`, twice as fast.
    BlazeDownWaitUpStay,
}

impl PlatKind {
    pub fn speed(self) -> i32 {
        match self {
            PlatKind::PerpetualRaise => PLATSPEED,
            PlatKind::DownWaitUpStay => PLATSPEED * 4,
            PlatKind::BlazeDownWaitUpStay => PLATSPEED * 8,
        }
    }

    /// Thinker ends once the floor is back up.
    pub fn is_one_shot(self) -> bool {
        !matches!(self, PlatKind::PerpetualRaise)
    }
}

/// What a tic of one platform asks of its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatResult {
    Continue,
    /// Cycle complete; remove the thinker.
    Finished,
}

#[derive(Debug, Clone)]
pub struct PlatThinker {
    pub sector: SectorId,
    pub speed: i32,
    pub low: i32,
    pub high: i32,
    pub wait: i32,
    pub count: i32,
    pub status: PlatStatus,
    /// direction travelled before the current wait
    pub old_status: PlatStatus,
    /// status to restore when leaving stasis
    pub resume: PlatStatus,
    pub tag: i16,
    pub kind: PlatKind,
}

impl PlatThinker {
    /// Set up a platform on `sector`.  Every kind starts by lowering.
    pub fn new(level: &Level, sector: SectorId, kind: PlatKind) -> Self {
        let sec = &level.sectors[sector as usize];
        let low = level.lowest_floor_surrounding(sector).min(sec.floor_h);
        let high = match kind {
            PlatKind::PerpetualRaise => level.highest_floor_surrounding(sector).max(sec.floor_h),
            PlatKind::DownWaitUpStay | PlatKind::BlazeDownWaitUpStay => sec.floor_h,
        };

        Self {
            sector,
            speed: kind.speed(),
            low,
            high,
            wait: SIM_FPS as i32 * PLATWAIT,
            count: 0,
            status: PlatStatus::Down,
            old_status: PlatStatus::Down,
            resume: PlatStatus::Down,
            tag: sec.tag,
            kind,
        }
    }

    /// Advance one tic, moving the sector floor.
    pub fn tick(&mut self, level: &mut Level) -> PlatResult {
        let floor = &mut level.sectors[self.sector as usize].floor_h;

        match self.status {
            PlatStatus::Down => {
                let next = *floor - self.speed;
                if next <= self.low {
                    *floor = self.low;
                    self.count = self.wait;
                    self.old_status = PlatStatus::Down;
                    self.status = PlatStatus::Waiting;
                } else {
                    *floor = next;
                }
            }
            PlatStatus::Up => {
                let next = *floor + self.speed;
                if next >= self.high {
                    *floor = self.high;
                    if self.kind.is_one_shot() {
                        return PlatResult::Finished;
                    }
                    self.count = self.wait;
                    self.old_status = PlatStatus::Up;
                    self.status = PlatStatus::Waiting;
                } else {
                    *floor = next;
                }
            }
            PlatStatus::Waiting => {
                self.count -= 1;
                if self.count <= 0 {
                    self.status = if self.old_status == PlatStatus::Down {
                        PlatStatus::Up
                    } else {
                        PlatStatus::Down
                    };
                }
            }
            PlatStatus::InStasis => {}
        }
        PlatResult::Continue
    }

    pub fn stop(&mut self) {
        if self.status != PlatStatus::InStasis {
            self.resume = self.status;
            self.status = PlatStatus::InStasis;
        }
    }

    pub fn activate(&mut self) {
        if self.status == PlatStatus::InStasis {
            self.status = self.resume;
        }
    }
}

/// Active platform thinkers, ticked in creation order.
#[derive(Debug, Default)]
pub struct Plats {
    active: Vec<PlatThinker>,
}

impl Plats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatThinker> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Platform currently driving `sector`, if any.
    pub fn on_sector(&self, sector: SectorId) -> Option<&PlatThinker> {
        self.active.iter().find(|p| p.sector == sector)
    }

    /// Start `kind` on every sector tagged `tag` that has no platform yet.
    /// A perpetual trigger first wakes matching platforms in stasis.
    /// Returns `true` if any new platform was created.
    pub fn ev_do_plat(&mut self, level: &Level, tag: i16, kind: PlatKind) -> bool {
        if kind == PlatKind::PerpetualRaise {
            self.activate_in_stasis(tag);
        }

        let mut created = false;
        for sector in level.sectors_with_tag(tag) {
            if self.on_sector(sector).is_some() {
                debug!("sector {sector} already has a platform, skipping");
                continue;
            }
            let plat = PlatThinker::new(level, sector, kind);
            info!(
                "{kind:?} on sector {sector}: low {} high {} speed {}",
                plat.low, plat.high, plat.speed
            );
            self.active.push(plat);
            created = true;
        }
        created
    }

    /// Put every platform tagged `tag` in stasis.
    pub fn ev_stop_plat(&mut self, tag: i16) {
        for p in self.active.iter_mut().filter(|p| p.tag == tag) {
            p.stop();
        }
    }

    pub fn activate_in_stasis(&mut self, tag: i16) {
        for p in self.active.iter_mut().filter(|p| p.tag == tag) {
            p.activate();
        }
    }

    /// Tick every platform once and drop the finished ones.  Returns the
    /// sectors whose platform completed this tic.
    pub fn run(&mut self, level: &mut Level) -> Vec<SectorId> {
        let mut done = Vec::new();
        self.active.retain_mut(|p| match p.tick(level) {
            PlatResult::Continue => true,
            PlatResult::Finished => {
                info!("platform on sector {} finished", p.sector);
                done.push(p.sector);
                false
            }
        });
        done
    }
}
