//! The per-frame pipeline.
//!
//! Order within a step is fixed: input, player movement, hazards, player
//! timers, enemies, enemy separation, caravans, caravan separation, then
//! the caravan push on the player. Every random draw comes from the state's
//! own generator, so a seed and an input sequence replay exactly.

use glam::DVec2;

use super::events::SimEvent;
use super::separation::separate;
use super::state::GameState;
use crate::collision::{slide_around, was_blocked};
use crate::combat::{resolve_attack, AttackRoll};
use crate::entity::{EnemyState, PlayerInput, PlayerSighting};
use crate::items::MELEE_RANGE;

/// Weapons reaching further than this aim along the facing direction.
pub const RANGED_WEAPON_MIN: f64 = 5.0;
/// Ranged targets beyond melee reach must lie within this cosine of facing.
pub const AIM_CONE_DOT: f64 = 0.7;
/// Caravans within this distance can be attacked when no enemy is in reach.
pub const KOROVAN_REACH: f64 = 10.0;

const ENEMY_SLIDE_FACTOR: f64 = 0.8;
const KOROVAN_SLIDE_FACTOR: f64 = 0.9;
const KOROVAN_EXPECTED_FACTOR: f64 = 0.3;
const MIN_PUSH_DIST: f64 = 0.001;
const MIN_KOROVAN_PUSH_DIST: f64 = 0.01;

impl GameState {
    /// Advance the simulation by `dt` seconds of input-driven play.
    ///
    /// `dt` is clamped to `[0, max_frame_dt]`; a non-finite delta is treated
    /// as zero. Once the player is dead the world is frozen and no events
    /// are produced.
    pub fn step(&mut self, dt: f64, input: &PlayerInput) -> Vec<SimEvent> {
        let mut events = Vec::new();
        if self.player.is_dead() {
            return events;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };

        self.apply_input(input, &mut events);
        self.move_player(dt, input.movement);
        self.check_hazards(&mut events);
        self.tick_player(dt, &mut events);
        self.update_enemies(dt, &mut events);
        self.separate_enemies(dt);
        self.update_korovans(dt);
        self.separate_korovans(dt);
        self.push_player_from_korovans();

        self.steps += 1;
        self.record(&events);
        events
    }

    fn apply_input(&mut self, input: &PlayerInput, events: &mut Vec<SimEvent>) {
        if let Some(heading) = input.heading.filter(|h| h.is_finite()) {
            self.player.heading = heading;
        }
        self.player.sneaking = input.sneak;
        if input.jump {
            self.player.try_jump();
        }
        if input.attack {
            self.player_attack(events);
        }
    }

    fn move_player(&mut self, dt: f64, movement: DVec2) {
        let config = &self.config;
        let player = &mut self.player;
        let dir = if movement.is_finite() {
            movement.normalize_or_zero()
        } else {
            DVec2::ZERO
        };
        if dir != DVec2::ZERO {
            let mut next = player.pos + dir * player.move_speed() * dt;
            next = self.world.resolve_buildings(next, config.player_radius);
            next = self.world.clamp_railings(next, config.player_railing_radius);
            let gap = config.player_enemy_gap;
            for enemy in self.enemies.iter().filter(|e| !e.is_dead()) {
                let away = next - enemy.pos;
                let dist = away.length();
                if dist < gap && dist > MIN_PUSH_DIST {
                    next += away / dist * (gap - dist);
                }
            }
            player.pos = next;
        }
        let bound = DVec2::splat(config.player_bound);
        player.pos = player.pos.clamp(-bound, bound);
        player.update_vertical(dt, self.world.height(player.pos));
    }

    fn check_hazards(&mut self, events: &mut Vec<SimEvent>) {
        if self.player.is_dead() {
            return;
        }
        if let Some(hazard) = self.world.hazard_at(self.player.pos) {
            self.player.kill(hazard.into());
            tracing::info!(hazard = hazard.describe(), "player killed by terrain");
            events.push(SimEvent::HazardDeath { hazard });
            events.push(SimEvent::PlayerDied {
                cause: hazard.into(),
            });
        }
    }

    fn tick_player(&mut self, dt: f64, events: &mut Vec<SimEvent>) {
        let was_alive = !self.player.is_dead();
        let (bleed, body_events) = self.player.tick(dt, self.config.bleed_interval);
        if bleed > 0 {
            events.push(SimEvent::Bleed { damage: bleed });
        }
        events.extend(body_events.into_iter().map(SimEvent::Body));
        if let (true, Some(cause)) = (was_alive, self.player.death()) {
            events.push(SimEvent::PlayerDied { cause });
        }
    }

    /// Swing at the best enemy in reach, falling back to the nearest caravan.
    fn player_attack(&mut self, events: &mut Vec<SimEvent>) {
        if !self.player.can_attack() {
            return;
        }
        let origin = self.player.pos;
        let forward = self.player.forward();
        let range = self.player.inventory.weapon_range();
        let ranged = range > RANGED_WEAPON_MIN;

        let mut target = None;
        let mut best = range;
        for enemy in self.enemies.iter().filter(|e| !e.is_dead()) {
            let delta = enemy.pos - origin;
            let dist = delta.length();
            if dist >= best {
                continue;
            }
            if ranged && dist > MELEE_RANGE && delta.dot(forward) / dist < AIM_CONE_DOT {
                continue;
            }
            target = Some(enemy.id.0);
            best = dist;
        }
        if let Some(index) = target {
            self.strike_enemy(index, events);
            return;
        }

        let korovan = self
            .korovans
            .iter()
            .filter(|k| k.is_alive() && !k.is_looted())
            .map(|k| (k.id.0, k.pos.distance(origin)))
            .filter(|&(_, dist)| dist < KOROVAN_REACH)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((index, _)) = korovan {
            self.strike_korovan(index, events);
        }
    }

    fn strike_enemy(&mut self, index: usize, events: &mut Vec<SimEvent>) {
        let damage = self.player.swing(&mut self.rng);
        let agility = self.player.effective_agility();
        let Some(enemy) = self.enemies.get_mut(index) else {
            return;
        };
        let (id, kind) = (enemy.id, enemy.kind());
        let was_calm = enemy.state().is_calm();
        let (result, killed) = enemy.defend(&mut self.rng, damage, agility, &self.config.aim_weights);
        if result.hit {
            events.push(SimEvent::EnemyHit {
                enemy: id,
                kind,
                damage: result.damage,
                crit: result.crit,
                part: result.target_part,
            });
            if was_calm && enemy.state() == EnemyState::Chase {
                events.push(SimEvent::Aggro { enemy: id, kind });
            }
        } else {
            events.push(SimEvent::EnemyDodged { enemy: id, kind });
        }
        let escort = enemy.escort_of();

        if killed {
            let loot = enemy.take_loot();
            self.player.kills += 1;
            self.killstreak += 1;
            tracing::debug!(enemy = id.0, kind = kind.key(), "enemy killed");
            events.push(SimEvent::EnemyKilled { enemy: id, kind });
            if !loot.is_empty() {
                loot.clone().grant(&mut self.player.inventory);
                events.push(SimEvent::LootGained(loot));
            }
            if self.config.is_killstreak(self.killstreak) {
                events.push(SimEvent::Killstreak {
                    count: self.killstreak,
                });
            }
        }
        if let Some(escort) = escort {
            self.alert_korovan(escort.korovan.0, events);
        }
    }

    fn strike_korovan(&mut self, index: usize, events: &mut Vec<SimEvent>) {
        self.alert_korovan(index, events);
        let damage = self.player.swing(&mut self.rng);
        let roll = AttackRoll {
            attacker_damage: damage,
            attacker_agility: self.player.effective_agility(),
            defender_armor: 0,
            defender_agility: 0,
        };
        let result = resolve_attack(&mut self.rng, roll, &self.config.aim_weights);
        let Some(korovan) = self.korovans.get_mut(index) else {
            return;
        };
        match korovan.attack(result.damage) {
            Ok(hit) => {
                events.push(SimEvent::KorovanHit {
                    korovan: korovan.id,
                    damage: hit.damage,
                    hp: hit.hp,
                });
                if let Some(loot) = hit.loot {
                    tracing::info!(korovan = korovan.id.0, gold = loot.gold, "caravan looted");
                    events.push(SimEvent::KorovanLooted {
                        korovan: korovan.id,
                    });
                    loot.clone().grant(&mut self.player.inventory);
                    events.push(SimEvent::LootGained(loot));
                }
            }
            Err(e) => tracing::debug!(korovan = index, error = %e, "caravan attack refused"),
        }
    }

    fn update_enemies(&mut self, dt: f64, events: &mut Vec<SimEvent>) {
        let radius = self.config.enemy_radius;
        let timeout = self.config.stuck_timeout;
        let gap = self.config.player_enemy_gap;

        for index in 0..self.enemies.len() {
            if self.enemies[index].is_dead() {
                continue;
            }
            if let Some(escort) = self.enemies[index].escort_of() {
                if let Some(korovan) = self.korovans.get(escort.korovan.0) {
                    let anchor = korovan.pos;
                    self.enemies[index].follow(anchor);
                }
            }

            let enemy = &mut self.enemies[index];
            let (id, kind) = (enemy.id, enemy.kind());
            let start = enemy.pos;
            let sighting = PlayerSighting {
                pos: self.player.pos,
                alive: !self.player.is_dead(),
                hostile: self.player.faction().is_hostile_to(enemy.faction()),
            };
            let tick = enemy.think(dt, sighting, &mut self.rng);
            if tick.aggro {
                events.push(SimEvent::Aggro { enemy: id, kind });
            }
            if tick.calmed {
                events.push(SimEvent::ChaseAbandoned { enemy: id, kind });
            }

            if let Some(damage) = tick.attack {
                events.push(SimEvent::EnemySwing {
                    enemy: id,
                    kind,
                    damage,
                });
                let was_alive = !self.player.is_dead();
                let hit = self.player.defend(
                    &mut self.rng,
                    damage,
                    enemy.stats().agility,
                    &self.config.aim_weights,
                );
                if hit.result.hit {
                    self.killstreak = 0;
                    if let Some(part) = hit.part {
                        events.push(SimEvent::PlayerHit {
                            enemy: id,
                            kind,
                            damage: hit.result.damage,
                            crit: hit.result.crit,
                            part,
                        });
                    }
                    events.extend(hit.events.into_iter().map(SimEvent::Body));
                } else {
                    events.push(SimEvent::PlayerDodged { enemy: id, kind });
                }
                if let (true, Some(cause)) = (was_alive, self.player.death()) {
                    tracing::info!(enemy = id.0, kind = kind.key(), "player slain");
                    events.push(SimEvent::PlayerDied { cause });
                }
            }

            let proposal = enemy.pos;
            let resolved = self.world.resolve_buildings(proposal, radius);
            let blocked = was_blocked(proposal, resolved);
            enemy.pos = resolved;
            if !matches!(enemy.state(), EnemyState::Dead | EnemyState::Idle) {
                let real = resolved.distance(start);
                let expected = enemy.expected_move(dt);
                if enemy.stuck.update(dt, blocked, real, expected, timeout) {
                    if enemy.state() == EnemyState::Patrol {
                        enemy.patrol.retarget(&mut self.rng);
                        enemy.stuck.reset();
                    } else if blocked {
                        enemy.pos = slide_around(
                            self.world.buildings(),
                            start,
                            resolved,
                            proposal,
                            enemy.stats().speed * dt * ENEMY_SLIDE_FACTOR,
                            radius,
                        );
                    }
                }
            }

            let away = enemy.pos - self.player.pos;
            let dist = away.length();
            if dist < gap && dist > MIN_PUSH_DIST {
                enemy.pos += away / dist * ((gap - dist) * 0.5);
            }
            enemy.z = self.world.height(enemy.pos);
        }
    }

    fn separate_enemies(&mut self, dt: f64) {
        let mut points: Vec<DVec2> = self.enemies.iter().map(|e| e.pos).collect();
        let active: Vec<bool> = self.enemies.iter().map(|e| !e.is_dead()).collect();
        separate(
            &mut points,
            &active,
            self.config.enemy_separation,
            dt,
            self.config.separation_mode,
        );
        for (enemy, pos) in self.enemies.iter_mut().zip(points) {
            if !enemy.is_dead() && pos != enemy.pos {
                enemy.pos = pos;
                enemy.z = self.world.height(pos);
            }
        }
    }

    fn update_korovans(&mut self, dt: f64) {
        let radius = self.config.korovan_radius;
        let timeout = self.config.stuck_timeout;
        for index in 0..self.korovans.len() {
            let calm = self.guards_calm(index);
            let road = &self.world.geography().road;
            let korovan = &mut self.korovans[index];
            let start = korovan.pos;
            korovan.update(dt, road, calm);
            if !korovan.is_alive() {
                continue;
            }

            let proposal = korovan.pos;
            let resolved = self.world.resolve_buildings(proposal, radius);
            let blocked = was_blocked(proposal, resolved);
            korovan.pos = resolved;
            let expected = if korovan.is_under_attack() {
                0.0
            } else {
                korovan.speed() * dt * KOROVAN_EXPECTED_FACTOR
            };
            let real = resolved.distance(start);
            if korovan.stuck.update(dt, blocked, real, expected, timeout) && blocked {
                korovan.pos = slide_around(
                    self.world.buildings(),
                    start,
                    resolved,
                    proposal,
                    korovan.speed() * dt * KOROVAN_SLIDE_FACTOR,
                    radius,
                );
            }
        }
    }

    fn separate_korovans(&mut self, dt: f64) {
        let mut points: Vec<DVec2> = self.korovans.iter().map(|k| k.pos).collect();
        let active: Vec<bool> = self.korovans.iter().map(|k| k.is_alive()).collect();
        separate(
            &mut points,
            &active,
            self.config.korovan_separation,
            dt,
            self.config.separation_mode,
        );
        for (korovan, pos) in self.korovans.iter_mut().zip(points) {
            if korovan.is_alive() {
                korovan.pos = pos;
            }
        }
    }

    fn push_player_from_korovans(&mut self) {
        let reach = self.config.korovan_push_radius;
        let player = &mut self.player;
        let before = player.pos;
        for korovan in self.korovans.iter().filter(|k| k.is_alive()) {
            let away = player.pos - korovan.pos;
            let dist = away.length();
            if dist < reach && dist > MIN_KOROVAN_PUSH_DIST {
                player.pos += away / dist * (reach - dist);
            }
        }
        if player.pos != before {
            let bound = DVec2::splat(self.config.player_bound);
            player.pos = player.pos.clamp(-bound, bound);
            player.update_vertical(0.0, self.world.height(player.pos));
        }
    }
}
