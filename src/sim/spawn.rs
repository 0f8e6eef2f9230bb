//! Initial population: the enemy spawn table and escorted caravans.

use glam::DVec2;

use crate::entity::{Enemy, EnemyId, EnemyKind, Korovan, KorovanId};
use crate::geo::Settlements;
use crate::rng::SimRng;
use crate::world::World;

/// Half-size of the square a group scatters over when none is given.
pub const DEFAULT_SPREAD: f64 = 25.0;
/// Enemies spawn this far above the ground and settle on the first tick.
const SPAWN_LIFT: f64 = 1.0;

/// Escort positions relative to their caravan.
pub const GUARD_OFFSETS: [DVec2; 4] = [
    DVec2::new(3.0, 2.0),
    DVec2::new(-3.0, 2.0),
    DVec2::new(3.0, -2.0),
    DVec2::new(-3.0, -2.0),
];

/// A batch of one enemy kind scattered around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnGroup {
    /// Template.
    pub kind: EnemyKind,
    /// Scatter center.
    pub center: DVec2,
    /// Number of enemies.
    pub count: usize,
    /// Half-size of the scatter square.
    pub spread: f64,
}

impl SpawnGroup {
    const fn new(kind: EnemyKind, center: DVec2, count: usize) -> Self {
        Self {
            kind,
            center,
            count,
            spread: DEFAULT_SPREAD,
        }
    }

    const fn spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }
}

/// Where every faction's forces start, anchored on the settlements.
#[must_use]
pub fn spawn_table(s: &Settlements) -> Vec<SpawnGroup> {
    let elf = s.elf_village;
    let palace = s.palace;
    let fort = s.fort_spawn();
    let gate = s.fort_gate();
    vec![
        SpawnGroup::new(EnemyKind::ElfWarrior, elf, 4),
        SpawnGroup::new(EnemyKind::ElfArcher, elf + DVec2::new(20.0, -20.0), 3),
        SpawnGroup::new(EnemyKind::PalaceGuard, palace, 5),
        SpawnGroup::new(EnemyKind::PalaceCaptain, palace - DVec2::new(0.0, 5.0), 1),
        SpawnGroup::new(EnemyKind::DarkSoldier, fort, 2).spread(15.0),
        SpawnGroup::new(EnemyKind::DarkSoldier, gate - DVec2::new(0.0, 5.0), 2).spread(5.0),
        SpawnGroup::new(EnemyKind::DarkSpy, fort + DVec2::new(-5.0, 10.0), 2).spread(12.0),
        SpawnGroup::new(EnemyKind::DarkLordMinion, gate - DVec2::new(0.0, 3.0), 1).spread(3.0),
        SpawnGroup::new(EnemyKind::NeutralBandit, DVec2::new(50.0, -50.0), 3),
        SpawnGroup::new(EnemyKind::NeutralBandit, DVec2::new(-50.0, 50.0), 2),
    ]
}

/// Populate the world from [`spawn_table`].
#[must_use]
pub fn spawn_enemies(world: &World, rng: &mut SimRng) -> Vec<Enemy> {
    let mut enemies = Vec::new();
    for group in spawn_table(&world.geography().settlements) {
        for _ in 0..group.count {
            let pos = group.center
                + DVec2::new(
                    rng.range_f64(-group.spread, group.spread),
                    rng.range_f64(-group.spread, group.spread),
                );
            let z = world.height(pos) + SPAWN_LIFT;
            enemies.push(Enemy::new(EnemyId(enemies.len()), group.kind, pos, z, rng));
        }
    }
    enemies
}

/// Spawn `count` caravans, each with four escorts appended to `enemies`.
pub fn spawn_korovans(
    world: &World,
    count: usize,
    enemies: &mut Vec<Enemy>,
    rng: &mut SimRng,
) -> Vec<Korovan> {
    let road = &world.geography().road;
    (0..count)
        .map(|i| {
            let id = KorovanId(i);
            let mut korovan = Korovan::new(id, road, rng);
            for offset in GUARD_OFFSETS {
                let guard_id = EnemyId(enemies.len());
                let z = world.height(korovan.pos + offset) + SPAWN_LIFT;
                enemies.push(Enemy::escort(guard_id, id, korovan.pos, offset, z, rng));
                korovan.guards.push(guard_id);
            }
            korovan
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_population() {
        let table = spawn_table(&Settlements::default());
        let total: usize = table.iter().map(|g| g.count).sum();
        assert_eq!(total, 25);
        let minion = table
            .iter()
            .find(|g| g.kind == EnemyKind::DarkLordMinion)
            .unwrap();
        assert!((minion.spread - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_enemies_scatter_within_spread() {
        let mut rng = SimRng::from_seed_u64(11);
        let world = World::generate(&mut rng);
        let enemies = spawn_enemies(&world, &mut rng);
        assert_eq!(enemies.len(), 25);
        let table = spawn_table(&world.geography().settlements);
        let mut i = 0;
        for group in table {
            for _ in 0..group.count {
                let e = &enemies[i];
                assert_eq!(e.id, EnemyId(i));
                assert_eq!(e.kind(), group.kind);
                let d = (e.pos - group.center).abs();
                assert!(d.x <= group.spread && d.y <= group.spread);
                i += 1;
            }
        }
    }

    #[test]
    fn test_caravans_bring_guards() {
        let mut rng = SimRng::from_seed_u64(12);
        let world = World::generate(&mut rng);
        let mut enemies = spawn_enemies(&world, &mut rng);
        let base = enemies.len();
        let korovans = spawn_korovans(&world, 5, &mut enemies, &mut rng);
        assert_eq!(korovans.len(), 5);
        assert_eq!(enemies.len(), base + 20);
        for k in &korovans {
            assert_eq!(k.guards.len(), 4);
            for (g, offset) in k.guards.iter().zip(GUARD_OFFSETS) {
                let guard = &enemies[g.0];
                assert_eq!(guard.kind(), EnemyKind::KorovanGuard);
                assert_eq!(guard.escort_of().map(|e| e.korovan), Some(k.id));
                assert!(guard.pos.distance(k.pos + offset) < 1e-9);
            }
        }
    }
}
