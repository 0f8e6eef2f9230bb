//! Merchant caravans shuttling along the main road.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{heading_of, EnemyId, KorovanId, Loot};
use crate::collision::StuckTracker;
use crate::error::ActionError;
use crate::items::ItemId;
use crate::rng::SimRng;

/// Structural HP of a fresh caravan.
pub const KOROVAN_HP: u32 = 150;
/// Distance at which a road waypoint counts as reached.
pub const WAYPOINT_REACHED: f64 = 2.0;

/// A pair of road waypoint indices a caravan shuttles between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KorovanRoute {
    /// Index the caravan starts at.
    pub start_wp: usize,
    /// Index it turns around at.
    pub end_wp: usize,
}

/// Routes a caravan can be assigned: elves to palace and back, and both
/// halves of the road via the fort.
pub const KOROVAN_ROUTES: [KorovanRoute; 5] = [
    KorovanRoute { start_wp: 0, end_wp: 18 },
    KorovanRoute { start_wp: 18, end_wp: 0 },
    KorovanRoute { start_wp: 0, end_wp: 9 },
    KorovanRoute { start_wp: 18, end_wp: 9 },
    KorovanRoute { start_wp: 9, end_wp: 18 },
];

const SPEED_RANGE: (f64, f64) = (4.0, 8.0);
const GOLD_RANGE: (i32, i32) = (40, 200);
const GOODS_PICKS: (i32, i32) = (2, 5);
const GOODS_QUANTITY: (i32, i32) = (3, 15);

/// Outcome of a landed blow on a caravan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KorovanHit {
    /// Damage dealt.
    pub damage: u32,
    /// HP left.
    pub hp: u32,
    /// Cargo, present only on the blow that broke the caravan.
    pub loot: Option<Loot>,
}

/// Stored caravan state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KorovanSnapshot {
    /// Position.
    pub pos: DVec2,
    /// Heading in degrees.
    pub heading: f64,
    /// Travel speed.
    pub speed: f64,
    /// Structural HP.
    pub hp: u32,
    /// Gold carried.
    pub gold: u32,
    /// Goods carried, by item key.
    #[serde(default)]
    pub goods: BTreeMap<String, u32>,
    /// Route start waypoint.
    pub start_wp: usize,
    /// Route end waypoint.
    pub end_wp: usize,
    /// Last waypoint reached.
    pub current_wp: usize,
    /// +1 toward higher indices, -1 toward lower.
    pub direction: i8,
    /// Still on the road.
    pub alive: bool,
    /// Already robbed.
    pub looted: bool,
    /// Halted by an attack.
    #[serde(default)]
    pub under_attack: bool,
}

/// A caravan and its cargo.
#[derive(Debug, Clone)]
pub struct Korovan {
    /// Index in the simulation.
    pub id: KorovanId,
    /// Position.
    pub pos: DVec2,
    /// Heading in degrees.
    pub heading: f64,
    speed: f64,
    hp: u32,
    gold: u32,
    goods: BTreeMap<ItemId, u32>,
    route: KorovanRoute,
    current_wp: usize,
    direction: i8,
    alive: bool,
    looted: bool,
    under_attack: bool,
    /// Escort enemies.
    pub guards: Vec<EnemyId>,
    /// Stuck detection for obstacle recovery.
    pub stuck: StuckTracker,
}

impl Korovan {
    /// Spawn a caravan on a random route, parked at its first waypoint.
    #[must_use]
    pub fn new(id: KorovanId, road: &[DVec2], rng: &mut SimRng) -> Self {
        let route = rng.pick(&KOROVAN_ROUTES).copied().unwrap_or(KOROVAN_ROUTES[0]);
        let pos = road.get(route.start_wp).copied().unwrap_or(DVec2::ZERO);
        let speed = rng.range_f64(SPEED_RANGE.0, SPEED_RANGE.1);
        let gold = rng.range_i32(GOLD_RANGE.0, GOLD_RANGE.1).unsigned_abs();
        let mut goods = BTreeMap::new();
        for _ in 0..rng.range_i32(GOODS_PICKS.0, GOODS_PICKS.1) {
            if let Some(&item) = rng.pick(&ItemId::TRADE_GOODS) {
                let qty = rng.range_i32(GOODS_QUANTITY.0, GOODS_QUANTITY.1).unsigned_abs();
                *goods.entry(item).or_insert(0) += qty;
            }
        }
        Self {
            id,
            pos,
            heading: 0.0,
            speed,
            hp: KOROVAN_HP,
            gold,
            goods,
            route,
            current_wp: route.start_wp,
            direction: if route.end_wp >= route.start_wp { 1 } else { -1 },
            alive: true,
            looted: false,
            under_attack: false,
            guards: Vec::new(),
            stuck: StuckTracker::default(),
        }
    }

    /// Travel speed.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Structural HP.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Gold carried.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Goods carried.
    #[must_use]
    pub const fn goods(&self) -> &BTreeMap<ItemId, u32> {
        &self.goods
    }

    /// Current route, swapped on every turnaround.
    #[must_use]
    pub const fn route(&self) -> KorovanRoute {
        self.route
    }

    /// Last waypoint reached.
    #[must_use]
    pub const fn current_wp(&self) -> usize {
        self.current_wp
    }

    /// Travel direction along the road indices.
    #[must_use]
    pub const fn direction(&self) -> i8 {
        self.direction
    }

    /// Still on the road.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Already robbed.
    #[must_use]
    pub const fn is_looted(&self) -> bool {
        self.looted
    }

    /// Halted by an attack.
    #[must_use]
    pub const fn is_under_attack(&self) -> bool {
        self.under_attack
    }

    /// Halt. The caller is responsible for alerting the guards.
    pub fn alert(&mut self) {
        if self.alive && !self.under_attack {
            tracing::debug!(korovan = self.id.0, "caravan halted");
        }
        self.under_attack = self.alive;
    }

    /// Advance along the road.
    ///
    /// `guards_calm` is whether no escort is still chasing; a halted caravan
    /// resumes only once that holds.
    pub fn update(&mut self, dt: f64, road: &[DVec2], guards_calm: bool) {
        if !self.alive {
            return;
        }
        if self.under_attack && guards_calm {
            tracing::debug!(korovan = self.id.0, "caravan resumes");
            self.under_attack = false;
        }
        if self.under_attack {
            return;
        }

        if self.current_wp == self.route.end_wp {
            self.turn_around();
        }
        let Some(next) = self.next_wp(road.len()) else {
            self.turn_around();
            return;
        };
        let Some(&target) = road.get(next) else {
            return;
        };

        let delta = target - self.pos;
        let dist = delta.length();
        if dist < WAYPOINT_REACHED {
            self.current_wp = next;
            return;
        }
        let step = (self.speed * dt).min(dist);
        self.pos += delta / dist * step;
        self.heading = heading_of(delta);
    }

    fn next_wp(&self, len: usize) -> Option<usize> {
        self.current_wp
            .checked_add_signed(isize::from(self.direction))
            .filter(|&i| i < len)
    }

    fn turn_around(&mut self) {
        self.route = KorovanRoute {
            start_wp: self.route.end_wp,
            end_wp: self.route.start_wp,
        };
        self.direction = -self.direction;
    }

    /// Hit the wagon. Halts it and, at zero HP, hands over the cargo once.
    ///
    /// # Errors
    ///
    /// [`ActionError::AlreadyLooted`] when the caravan was already broken;
    /// nothing changes in that case.
    pub fn attack(&mut self, damage: u32) -> Result<KorovanHit, ActionError> {
        if self.looted {
            return Err(ActionError::AlreadyLooted);
        }
        self.hp = self.hp.saturating_sub(damage);
        self.alert();

        let loot = if self.hp == 0 {
            self.looted = true;
            self.alive = false;
            self.under_attack = false;
            tracing::debug!(korovan = self.id.0, gold = self.gold, "caravan looted");
            Some(Loot {
                gold: std::mem::take(&mut self.gold),
                items: std::mem::take(&mut self.goods),
            })
        } else {
            None
        };
        Ok(KorovanHit {
            damage,
            hp: self.hp,
            loot,
        })
    }

    /// Capture for persistence.
    #[must_use]
    pub fn to_snapshot(&self) -> KorovanSnapshot {
        KorovanSnapshot {
            pos: self.pos,
            heading: self.heading,
            speed: self.speed,
            hp: self.hp,
            gold: self.gold,
            goods: self
                .goods
                .iter()
                .map(|(item, &n)| (item.key().to_string(), n))
                .collect(),
            start_wp: self.route.start_wp,
            end_wp: self.route.end_wp,
            current_wp: self.current_wp,
            direction: self.direction,
            alive: self.alive,
            looted: self.looted,
            under_attack: self.under_attack,
        }
    }

    /// Overwrite state from persistence. Waypoint indices are clamped to the
    /// road and unknown goods are skipped.
    pub fn restore(&mut self, snapshot: &KorovanSnapshot, road_len: usize) {
        let last = road_len.saturating_sub(1);
        self.pos = snapshot.pos;
        self.heading = snapshot.heading;
        self.speed = snapshot.speed;
        self.hp = snapshot.hp.min(KOROVAN_HP);
        self.gold = snapshot.gold;
        self.goods.clear();
        for (key, &count) in &snapshot.goods {
            match ItemId::from_key(key) {
                Some(item) => *self.goods.entry(item).or_insert(0) += count,
                None => tracing::warn!(item = %key, "skipping unknown caravan goods"),
            }
        }
        self.route = KorovanRoute {
            start_wp: snapshot.start_wp.min(last),
            end_wp: snapshot.end_wp.min(last),
        };
        self.current_wp = snapshot.current_wp.min(last);
        self.direction = if snapshot.direction < 0 { -1 } else { 1 };
        self.looted = snapshot.looted || self.hp == 0;
        self.alive = snapshot.alive && !self.looted;
        self.under_attack = snapshot.under_attack && self.alive;
        if self.looted {
            self.hp = 0;
            self.gold = 0;
            self.goods.clear();
        }
        self.stuck.reset();
    }
}
