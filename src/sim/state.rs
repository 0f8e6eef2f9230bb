//! The simulation context and the player's out-of-combat actions.

use serde::Serialize;

use super::events::SimEvent;
use super::spawn::{spawn_enemies, spawn_korovans};
use crate::body::BodyPartId;
use crate::combat::{CombatLog, LogSource};
use crate::config::SimConfig;
use crate::entity::{Enemy, EnemyId, EnemyState, Korovan, Player};
use crate::error::{ActionError, ConfigError};
use crate::faction::Faction;
use crate::items::{ItemId, ItemKind, Market};
use crate::rng::SimRng;
use crate::world::{World, Zone};

/// Render-facing summary of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityView {
    /// `"player"`, `"korovan"` or the enemy template key.
    pub kind: &'static str,
    /// Index within its kind.
    pub id: usize,
    /// World x.
    pub x: f64,
    /// World y.
    pub y: f64,
    /// Elevation.
    pub z: f64,
    /// Heading in degrees.
    pub heading: f64,
    /// State label.
    pub state: &'static str,
    /// Current HP (vital parts for the player).
    pub hp: u32,
}

/// Complete simulation state.
///
/// The world is built once from the seed; every other field is advanced by
/// [`GameState::step`].
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tunables.
    pub config: SimConfig,
    /// Static terrain and buildings.
    pub world: World,
    /// The player.
    pub player: Player,
    /// Every enemy, indexed by [`EnemyId`]. Dead ones stay.
    pub enemies: Vec<Enemy>,
    /// Every caravan, indexed by their id.
    pub korovans: Vec<Korovan>,
    /// One market per zone.
    pub markets: Vec<Market>,
    /// Human-readable event mirror.
    pub log: CombatLog,
    /// Kills since the player last took damage.
    pub killstreak: u32,
    pub(super) rng: SimRng,
    pub(super) seed: u64,
    pub(super) steps: u64,
}

impl GameState {
    /// Build the world and populate it for a new `faction` session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn new(config: SimConfig, faction: Faction, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SimRng::from_seed_u64(seed);
        let world = World::generate(&mut rng);
        let mut player = Player::new(faction, &world.geography().settlements);
        player.update_vertical(0.0, world.height(player.pos));
        let mut enemies = spawn_enemies(&world, &mut rng);
        let korovans = spawn_korovans(&world, config.korovan_count, &mut enemies, &mut rng);
        let log = CombatLog::new(config.log_capacity);
        tracing::info!(
            %faction,
            seed,
            enemies = enemies.len(),
            korovans = korovans.len(),
            "session started"
        );
        Ok(Self {
            config,
            world,
            player,
            enemies,
            korovans,
            markets: Zone::ALL.map(Market::new).to_vec(),
            log,
            killstreak: 0,
            rng,
            seed,
            steps: 0,
        })
    }

    /// World seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Frames stepped so far.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Seconds of play.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.player.play_time()
    }

    /// Look up an enemy.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id.0)
    }

    /// Living enemies.
    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| !e.is_dead())
    }

    /// Zone the player stands in.
    #[must_use]
    pub fn current_zone(&self) -> Zone {
        self.world.zone_at(self.player.pos)
    }

    /// Market of a zone.
    #[must_use]
    pub fn market(&self, zone: Zone) -> Option<&Market> {
        self.markets.iter().find(|m| m.zone() == zone)
    }

    /// Index of the market serving the player's zone, opened on demand.
    fn local_market(&mut self) -> Result<usize, ActionError> {
        if self.player.is_dead() {
            return Err(ActionError::Dead);
        }
        let zone = self.world.zone_at(self.player.pos);
        if let Some(i) = self.markets.iter().position(|m| m.zone() == zone) {
            return Ok(i);
        }
        self.markets.push(Market::new(zone));
        Ok(self.markets.len() - 1)
    }

    /// Buy one `item` at the local market. Returns the price paid.
    ///
    /// # Errors
    ///
    /// Dead player, item not listed, out of stock or not enough gold.
    pub fn buy(&mut self, item: ItemId) -> Result<u32, ActionError> {
        let index = self.local_market()?;
        let price = self.markets[index].buy(item, &mut self.player.inventory)?;
        self.log.add(format!("bought {item} for {price} gold"), LogSource::Trade);
        Ok(price)
    }

    /// Sell one `item` at the local market. Returns the gold received.
    ///
    /// # Errors
    ///
    /// Dead player or item not held.
    pub fn sell(&mut self, item: ItemId) -> Result<u32, ActionError> {
        let index = self.local_market()?;
        let price = self.markets[index].sell(item, &mut self.player.inventory)?;
        self.log.add(format!("sold {item} for {price} gold"), LogSource::Trade);
        Ok(price)
    }

    /// Equip a held weapon or armor.
    ///
    /// # Errors
    ///
    /// Dead player, item not held, or neither weapon nor armor.
    pub fn equip(&mut self, item: ItemId) -> Result<(), ActionError> {
        if self.player.is_dead() {
            return Err(ActionError::Dead);
        }
        let inventory = &mut self.player.inventory;
        match item.kind() {
            ItemKind::Weapon { .. } => inventory.equip_weapon(item)?,
            ItemKind::Armor { .. } => inventory.equip_armor(item)?,
            _ => {
                return Err(ActionError::WrongItemKind {
                    item,
                    expected: "weapon or armor",
                });
            }
        }
        self.log.add(format!("equipped {item}"), LogSource::System);
        Ok(())
    }

    /// Use a consumable on the player. Returns the heal amount.
    ///
    /// # Errors
    ///
    /// See [`Player::use_item`].
    pub fn use_item(&mut self, item: ItemId) -> Result<u32, ActionError> {
        let heal = self.player.use_item(item)?;
        self.log.add(format!("used {item}"), LogSource::Body);
        Ok(heal)
    }

    /// Fit a prosthetic from the inventory.
    ///
    /// # Errors
    ///
    /// See [`Player::fit_prosthetic`].
    pub fn fit_prosthetic(&mut self, item: ItemId) -> Result<BodyPartId, ActionError> {
        let part = self.player.fit_prosthetic(item)?;
        self.log.add(format!("{item} fitted on the {part}"), LogSource::Body);
        Ok(part)
    }

    /// Position, heading, state and HP of every entity, player first.
    #[must_use]
    pub fn views(&self) -> Vec<EntityView> {
        let mut views = Vec::with_capacity(1 + self.enemies.len() + self.korovans.len());
        let p = &self.player;
        let player_state = if p.is_dead() {
            "dead"
        } else if p.is_airborne() {
            "jumping"
        } else if p.sneaking {
            "sneaking"
        } else {
            "alive"
        };
        views.push(EntityView {
            kind: "player",
            id: 0,
            x: p.pos.x,
            y: p.pos.y,
            z: p.z,
            heading: p.heading,
            state: player_state,
            hp: p.body.total_hp(),
        });
        views.extend(self.enemies.iter().map(|e| EntityView {
            kind: e.kind().key(),
            id: e.id.0,
            x: e.pos.x,
            y: e.pos.y,
            z: e.z,
            heading: e.heading,
            state: e.state().key(),
            hp: e.hp(),
        }));
        views.extend(self.korovans.iter().map(|k| EntityView {
            kind: "korovan",
            id: k.id.0,
            x: k.pos.x,
            y: k.pos.y,
            z: self.world.height(k.pos),
            heading: k.heading,
            state: if k.is_looted() {
                "looted"
            } else if k.is_under_attack() {
                "halted"
            } else {
                "moving"
            },
            hp: k.hp(),
        }));
        views
    }

    /// No escort of caravan `index` is still chasing.
    #[must_use]
    pub fn guards_calm(&self, index: usize) -> bool {
        self.korovans.get(index).is_none_or(|k| {
            k.guards
                .iter()
                .all(|g| self.enemies.get(g.0).is_none_or(|e| e.state().is_calm()))
        })
    }

    /// Halt caravan `index` and turn every living escort on the player.
    pub(super) fn alert_korovan(&mut self, index: usize, events: &mut Vec<SimEvent>) {
        let Some(k) = self.korovans.get_mut(index) else {
            return;
        };
        if !k.is_alive() {
            return;
        }
        if !k.is_under_attack() {
            events.push(SimEvent::KorovanAlerted { korovan: k.id });
        }
        k.alert();
        for &guard in &k.guards {
            if let Some(e) = self.enemies.get_mut(guard.0) {
                if e.alert() && e.state() == EnemyState::Chase {
                    events.push(SimEvent::Aggro {
                        enemy: e.id,
                        kind: e.kind(),
                    });
                }
            }
        }
    }

    /// Mirror events into the combat log.
    pub(super) fn record(&mut self, events: &[SimEvent]) {
        for line in events.iter().filter_map(SimEvent::log_line) {
            self.log.add(line.msg, line.source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn state() -> GameState {
        GameState::new(SimConfig::default(), Faction::Guards, 7).unwrap()
    }

    #[test]
    fn test_new_session_population() {
        let s = state();
        assert_eq!(s.enemies.len(), 25 + 20);
        assert_eq!(s.korovans.len(), 5);
        for (i, e) in s.enemies.iter().enumerate() {
            assert_eq!(e.id, EnemyId(i));
        }
        assert_eq!(s.markets.len(), 4);
        let ground = s.world.height(s.player.pos);
        assert!((s.player.z - ground - crate::entity::GROUND_OFFSET).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            max_frame_dt: 0.0,
            ..SimConfig::default()
        };
        assert!(GameState::new(config, Faction::Elves, 1).is_err());
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = state();
        let b = state();
        assert_eq!(a.views(), b.views());
    }

    #[test]
    fn test_trade_in_palace_zone() {
        let mut s = state();
        s.player.pos = DVec2::new(200.0, 200.0);
        assert_eq!(s.current_zone(), Zone::Palace);
        s.player.inventory.gold = 1000;
        assert_eq!(s.buy(ItemId::PlateArmor).map(|_| ()), Ok(()));
        assert!(s.player.inventory.has(ItemId::PlateArmor, 1));
        assert_eq!(
            s.buy(ItemId::Gems),
            Err(ActionError::NotStocked(ItemId::Gems))
        );
        let gold = s.player.inventory.gold;
        let got = s.sell(ItemId::PlateArmor).unwrap();
        assert_eq!(s.player.inventory.gold, gold + got);
        assert!(s.log.lines().any(|l| l.source == LogSource::Trade));
    }

    #[test]
    fn test_trade_reopens_missing_market() {
        let mut s = state();
        s.player.pos = DVec2::new(200.0, 200.0);
        s.markets.clear();
        s.player.inventory.gold = 1000;
        assert!(s.buy(ItemId::PlateArmor).is_ok());
        assert_eq!(s.markets.len(), 1);
        assert!(s.market(Zone::Palace).is_some());
        assert!(s.sell(ItemId::PlateArmor).is_ok());
        assert_eq!(s.markets.len(), 1);
    }

    #[test]
    fn test_dead_player_cannot_trade() {
        let mut s = state();
        s.player.pos = DVec2::new(200.0, 200.0);
        s.player.inventory.gold = 1000;
        s.player.kill(crate::entity::DeathCause::Slain);
        assert_eq!(s.buy(ItemId::PlateArmor), Err(ActionError::Dead));
        assert_eq!(s.player.inventory.gold, 1000);
    }

    #[test]
    fn test_equip_checks_kind() {
        let mut s = state();
        s.player.inventory.add(ItemId::ChainMail, 1);
        assert_eq!(s.equip(ItemId::ChainMail), Ok(()));
        assert_eq!(s.player.inventory.armor(), Some(ItemId::ChainMail));
        s.player.inventory.add(ItemId::Ale, 1);
        assert!(matches!(
            s.equip(ItemId::Ale),
            Err(ActionError::WrongItemKind { .. })
        ));
    }

    #[test]
    fn test_views_cover_every_entity() {
        let s = state();
        let views = s.views();
        assert_eq!(views.len(), 1 + s.enemies.len() + s.korovans.len());
        assert_eq!(views[0].kind, "player");
        assert_eq!(views[0].hp, 280);
        assert!(views.iter().filter(|v| v.kind == "korovan").all(|v| v.state == "moving"));
    }

    #[test]
    fn test_alerting_caravan_turns_guards() {
        let mut s = state();
        let mut events = Vec::new();
        s.alert_korovan(0, &mut events);
        assert!(s.korovans[0].is_under_attack());
        assert!(!s.guards_calm(0));
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::KorovanAlerted { .. })));
        let aggro = events
            .iter()
            .filter(|e| matches!(e, SimEvent::Aggro { .. }))
            .count();
        assert_eq!(aggro, 4);
    }
}
