//! Per-tic player update: turn, thrust, XY move, friction, floor snap.
//!
//! The player never leaves the floor.  Vertical position is whatever the
//! sector under its centre says after the move, so there is no gravity,
//! jumping or falling here.

use log::{debug, warn};

use super::collision::{Body, MoveOutcome, try_move};
use super::components::{Buttons, InputCmd};
use crate::math::{ANG90, ANG180, Bam, FINEANGLES, FINEMASK, FRACUNIT, Fixed, finesine};
use crate::world::{Level, SectorId};

/* ----------------------------------------------------------------- */
/*  Physics constants (16.16)                                        */
/* ----------------------------------------------------------------- */
pub const MAXMOVE: Fixed = Fixed(30 * FRACUNIT);
pub const STOPSPEED: Fixed = Fixed(0x1000); // 1/16 unit per tic
pub const FRICTION: Fixed = Fixed(0xE800); // 0.90625 kept per tic
pub const VIEWHEIGHT: Fixed = Fixed(41 * FRACUNIT);
pub const MAXBOB: Fixed = Fixed(16 * FRACUNIT);

/// Tuning fixed at spawn.  Index 0 of each pair is walking, 1 running.
#[derive(Clone, Copy, Debug)]
pub struct PlayerConfig {
    pub forward_speed: [Fixed; 2],
    pub side_speed: [Fixed; 2],
    pub turn_speed: [Bam; 2],
    pub radius: Fixed,
    /// map units
    pub height: i32,
    pub view_height: Fixed,
    /// add momentum-driven view bob to `viewz`
    pub bob: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        // forwardmove/sidemove/angleturn from the vanilla tables
        Self {
            forward_speed: [Fixed(0x19 * 2048), Fixed(0x32 * 2048)],
            side_speed: [Fixed(0x18 * 2048), Fixed(0x28 * 2048)],
            turn_speed: [Bam(640 << 16), Bam(1280 << 16)],
            radius: Fixed::from_int(16),
            height: 56,
            view_height: VIEWHEIGHT,
            bob: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlayerState {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub angle: Bam,
    pub momx: Fixed,
    pub momy: Fixed,

    pub viewz: Fixed,
    pub viewheight: Fixed,
    pub deltaviewheight: Fixed,
    pub bob: Fixed,

    // carried for the HUD, untouched here
    pub health: i32,
    pub armor: i32,
    pub ammo: i32,
    pub max_ammo: i32,

    pub config: PlayerConfig,
    /// cache, recomputed every tic
    pub sector: SectorId,
    /// result of the last XY move, `None` if momentum was zero
    pub last_move: Option<MoveOutcome>,
}

impl PlayerState {
    /// Spawn at the first player start, or at the origin facing east if the
    /// map has none.
    pub fn spawn(level: &Level, config: PlayerConfig) -> Self {
        let (x, y, angle) = match level.player_start() {
            Some(t) => (
                Fixed::from_int(t.pos.x),
                Fixed::from_int(t.pos.y),
                Bam::from_degrees(t.angle as f64),
            ),
            None => {
                warn!("level {} has no player start, spawning at origin", level.name);
                (Fixed::ZERO, Fixed::ZERO, Bam(0))
            }
        };

        let mut player = Self {
            x,
            y,
            z: Fixed::ZERO,
            angle,
            momx: Fixed::ZERO,
            momy: Fixed::ZERO,
            viewz: Fixed::ZERO,
            viewheight: config.view_height,
            deltaviewheight: Fixed::ZERO,
            bob: Fixed::ZERO,
            health: 100,
            armor: 0,
            ammo: 50,
            max_ammo: 200,
            config,
            sector: 0,
            last_move: None,
        };
        player.resync(level, 0);
        debug!(
            "player spawned at ({}, {}) angle {:.1}° in sector {}",
            player.x,
            player.y,
            player.angle.to_degrees(),
            player.sector
        );
        player
    }

    /// Collision footprint at the current floor.
    pub fn body(&self, level: &Level) -> Body {
        Body {
            radius: self.config.radius,
            height: self.config.height,
            floor: level.sectors[self.sector as usize].floor_h,
        }
    }

    /// Add `speed` along `angle` to the momentum.
    #[inline]
    pub fn thrust(&mut self, angle: Bam, speed: Fixed) {
        self.momx += speed * angle.cos();
        self.momy += speed * angle.sin();
    }

    /// One simulation tic.
    pub fn tick(&mut self, level: &Level, cmd: InputCmd, level_time: u32) {
        self.turn(cmd);
        self.move_player(cmd);
        self.last_move = self.xy_movement(level);
        self.momx = apply_friction(self.momx);
        self.momy = apply_friction(self.momy);
        self.resync(level, level_time);
    }

    fn turn(&mut self, cmd: InputCmd) {
        if cmd.held(Buttons::STRAFE) {
            return;
        }
        let speed = self.config.turn_speed[cmd.held(Buttons::RUN) as usize];
        if cmd.held(Buttons::TURN_LEFT) {
            self.angle += speed;
        }
        if cmd.held(Buttons::TURN_RIGHT) {
            self.angle -= speed;
        }
    }

    fn move_player(&mut self, cmd: InputCmd) {
        let run = cmd.held(Buttons::RUN) as usize;
        let forward = self.config.forward_speed[run];
        let side = self.config.side_speed[run];
        let angle = self.angle;

        if cmd.held(Buttons::FORWARD) {
            self.thrust(angle, forward);
        }
        if cmd.held(Buttons::BACK) {
            self.thrust(angle + ANG180, forward);
        }

        // with STRAFE held the turn keys slide sideways
        let strafe_on = cmd.held(Buttons::STRAFE);
        let mut left = cmd.held(Buttons::STRAFE_LEFT) as i32;
        let mut right = cmd.held(Buttons::STRAFE_RIGHT) as i32;
        if strafe_on {
            left += cmd.held(Buttons::TURN_LEFT) as i32;
            right += cmd.held(Buttons::TURN_RIGHT) as i32;
        }
        for _ in 0..left {
            self.thrust(angle + ANG90, side);
        }
        for _ in 0..right {
            self.thrust(angle - ANG90, side);
        }
    }

    fn xy_movement(&mut self, level: &Level) -> Option<MoveOutcome> {
        if self.momx.is_zero() && self.momy.is_zero() {
            return None;
        }
        self.momx = self.momx.clamp(-MAXMOVE, MAXMOVE);
        self.momy = self.momy.clamp(-MAXMOVE, MAXMOVE);

        let body = self.body(level);
        let (mut x, mut y) = (self.x, self.y);
        let outcome = try_move(level, &body, &mut x, &mut y, self.momx, self.momy);
        self.x = x;
        self.y = y;
        Some(outcome)
    }

    /// Re-locate the sector and snap to its floor.
    fn resync(&mut self, level: &Level, level_time: u32) {
        self.sector = level.locate_sector(self.x.to_int(), self.y.to_int());
        self.z = Fixed::from_int(level.sectors[self.sector as usize].floor_h);
        self.calc_height(level_time);
    }

    /// View height: recover from `deltaviewheight`, then optional bob.
    fn calc_height(&mut self, level_time: u32) {
        let full = self.config.view_height;
        let half = Fixed(full.raw() / 2);

        self.viewheight += self.deltaviewheight;
        if self.viewheight > full {
            self.viewheight = full;
            self.deltaviewheight = Fixed::ZERO;
        }
        if self.viewheight < half {
            self.viewheight = half;
            if self.deltaviewheight <= Fixed::ZERO {
                self.deltaviewheight = Fixed(1);
            }
        }
        if !self.deltaviewheight.is_zero() {
            self.deltaviewheight += Fixed(FRACUNIT / 4);
            if self.deltaviewheight.is_zero() {
                self.deltaviewheight = Fixed(1);
            }
        }

        let mut bob_z = Fixed::ZERO;
        if self.config.bob {
            self.bob = Fixed(((self.momx * self.momx).raw() + (self.momy * self.momy).raw()) >> 2)
                .clamp(Fixed::ZERO, MAXBOB);
            let fine = (FINEANGLES / 20 * level_time as usize) & FINEMASK;
            bob_z = Fixed(self.bob.raw() / 2) * Fixed(finesine(fine));
        }

        self.viewz = self.z + self.viewheight + bob_z;
    }
}

/// One tic of ground friction on a single momentum component.  Anything
/// slower than `STOPSPEED` afterwards is zeroed so motion stops in a
/// bounded number of tics.
#[inline]
pub fn apply_friction(mom: Fixed) -> Fixed {
    let slowed = mom * FRICTION;
    if slowed.abs() < STOPSPEED {
        Fixed::ZERO
    } else {
        slowed
    }
}
