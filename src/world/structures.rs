//! Collision footprints for every placed structure.
//!
//! Bridges are walkable and never produce a box.

use glam::DVec2;

use crate::collision::BuildingBox;
use crate::geo::Geography;
use crate::rng::SimRng;

/// Palace corner tower side.
const PALACE_TOWER: f64 = 7.0;
/// Palace wall length between towers.
const PALACE_WALL_SPAN: f64 = 30.0;
/// Palace main hall side.
const PALACE_HALL: f64 = 28.0;
/// Palace central keep side.
const PALACE_DONJON: f64 = 10.0;
/// Fort main hall side.
const FORT_HALL: f64 = 22.0;
/// Fort hall offset from the fort center, toward the south-west.
const FORT_HALL_OFFSET: f64 = -25.0;
/// Fort wall thickness.
const FORT_WALL_THICKNESS: f64 = 2.0;
/// Elf house sides are drawn from this range.
const ELF_HOUSE_SIZE: (f64, f64) = (5.0, 9.0);

const CORNERS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

/// A wall centered `offset` away from `center` on each side.
fn ring_walls(center: DVec2, offset: f64, span: f64, thickness: f64) -> [BuildingBox; 4] {
    [
        BuildingBox::around(center - DVec2::new(offset, 0.0), thickness, span),
        BuildingBox::around(center + DVec2::new(offset, 0.0), thickness, span),
        BuildingBox::around(center - DVec2::new(0.0, offset), span, thickness),
        BuildingBox::around(center + DVec2::new(0.0, offset), span, thickness),
    ]
}

/// Build the box list in placement order: elf houses, palace, fort, town.
///
/// Elf house sizes are rolled from `rng`, so the same seed always yields
/// the same list.
#[must_use]
pub fn building_boxes(geo: &Geography, rng: &mut SimRng) -> Vec<BuildingBox> {
    let s = &geo.settlements;
    let mut boxes = Vec::with_capacity(geo.elf_houses.len() + geo.town_buildings.len() + 20);

    for &house in &geo.elf_houses {
        let w = rng.range_f64(ELF_HOUSE_SIZE.0, ELF_HOUSE_SIZE.1);
        let d = rng.range_f64(ELF_HOUSE_SIZE.0, ELF_HOUSE_SIZE.1);
        boxes.push(BuildingBox::around(house, w, d));
    }

    boxes.push(BuildingBox::around(s.palace, PALACE_HALL, PALACE_HALL));
    for (sx, sy) in CORNERS {
        let tower = s.palace + DVec2::new(sx, sy) * s.palace_wall_offset;
        boxes.push(BuildingBox::around(tower, PALACE_TOWER, PALACE_TOWER));
    }
    boxes.extend(ring_walls(
        s.palace,
        s.palace_wall_offset,
        PALACE_WALL_SPAN,
        s.palace_wall_thickness,
    ));
    boxes.push(BuildingBox::around(s.palace, PALACE_DONJON, PALACE_DONJON));

    boxes.push(BuildingBox::around(
        s.fort + DVec2::splat(FORT_HALL_OFFSET),
        FORT_HALL,
        FORT_HALL,
    ));
    for (sx, sy) in CORNERS {
        let tower = s.fort + DVec2::new(sx, sy) * s.fort_tower_offset;
        boxes.push(BuildingBox::around(
            tower,
            s.fort_tower_width,
            s.fort_tower_width,
        ));
    }
    boxes.extend(ring_walls(
        s.fort,
        s.fort_tower_offset,
        s.fort_tower_offset * 2.0,
        FORT_WALL_THICKNESS,
    ));

    boxes.extend(geo.town_buildings.iter().copied().map(BuildingBox::from));
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::FOOTPRINT_MARGIN;

    #[test]
    fn test_box_count() {
        let geo = Geography::standard();
        let boxes = building_boxes(&geo, &mut SimRng::from_seed_u64(1));
        // 7 houses, palace 1+4+4+1, fort 1+4+4, 10 town buildings.
        assert_eq!(boxes.len(), 7 + 10 + 9 + 10);
    }

    #[test]
    fn test_same_seed_same_houses() {
        let geo = Geography::standard();
        let a = building_boxes(&geo, &mut SimRng::from_seed_u64(5));
        let b = building_boxes(&geo, &mut SimRng::from_seed_u64(5));
        assert_eq!(a, b);
        for house in &a[..7] {
            assert!(house.half_width >= 2.5 + FOOTPRINT_MARGIN);
            assert!(house.half_width < 4.5 + FOOTPRINT_MARGIN);
        }
    }

    #[test]
    fn test_bridges_stay_clear() {
        let geo = Geography::standard();
        let boxes = building_boxes(&geo, &mut SimRng::default());
        for bridge in &geo.bridges {
            assert!(boxes.iter().all(|b| !b.contains_expanded(bridge.center, 0.5)));
        }
    }

    #[test]
    fn test_fort_walls_connect_towers() {
        let geo = Geography::standard();
        let boxes = building_boxes(&geo, &mut SimRng::default());
        let gate = geo.settlements.fort_gate();
        assert!(boxes.iter().any(|b| b.contains_expanded(gate, 0.0)));
    }
}
