//! Randomised standard setup: terrain, dice numbers and ports.

use crate::board::{Board, PortKind, Resource, StreetKey, Terrain, TileId};
use crate::error::BoardError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// Shuffles tried before accepting a number layout with neighbouring 6s and 8s
const MAX_ATTEMPTS: usize = 100;

/// Ports on a standard board
pub const STANDARD_PORT_COUNT: usize = 9;

/// Terrain of the 19 classic tiles
pub fn standard_terrain_pool() -> Vec<Terrain> {
    let mut pool = Vec::with_capacity(19);
    for (terrain, count) in [
        (Terrain::Forest, 4),
        (Terrain::Fields, 4),
        (Terrain::Pasture, 4),
        (Terrain::Mountains, 3),
        (Terrain::Hills, 3),
        (Terrain::Desert, 1),
    ] {
        pool.extend(std::iter::repeat(terrain).take(count));
    }
    pool
}

/// Dice numbers of the 18 producing classic tiles
pub const STANDARD_NUMBERS: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

/// Shuffle terrain over every tile, then dice numbers over the producing ones.
///
/// The pools repeat for boards larger than the classic island and are cut
/// short for smaller ones. Deserts get no number.
pub fn assign_standard_terrain<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Result<(), BoardError> {
    let tiles = board.tile_ids();
    let mut terrain: Vec<Terrain> = standard_terrain_pool()
        .into_iter()
        .cycle()
        .take(tiles.len())
        .collect();
    terrain.shuffle(rng);

    let producing: Vec<TileId> = tiles
        .iter()
        .zip(&terrain)
        .filter(|(_, terrain)| **terrain != Terrain::Desert)
        .map(|(id, _)| *id)
        .collect();
    let numbers: Vec<u8> = STANDARD_NUMBERS
        .iter()
        .copied()
        .cycle()
        .take(producing.len())
        .collect();
    let numbers = assign_numbers_avoiding_adjacent_68(board, &producing, &numbers, rng);

    let dice: HashMap<TileId, u8> = producing.into_iter().zip(numbers).collect();
    for (id, terrain) in tiles.into_iter().zip(terrain) {
        board.set_tile(id, terrain, dice.get(&id).copied())?;
    }

    debug!(tiles = board.tile_ids().len(), "Assigned standard terrain");
    Ok(())
}

fn assign_numbers_avoiding_adjacent_68<R: Rng + ?Sized>(
    board: &Board,
    tiles: &[TileId],
    numbers: &[u8],
    rng: &mut R,
) -> Vec<u8> {
    let mut shuffled = numbers.to_vec();
    for _ in 0..MAX_ATTEMPTS {
        shuffled.shuffle(rng);
        if is_valid_number_placement(board, tiles, &shuffled) {
            return shuffled;
        }
    }
    // Rare on real boards; keep the last shuffle
    shuffled
}

fn is_valid_number_placement(board: &Board, tiles: &[TileId], numbers: &[u8]) -> bool {
    let placed: HashMap<TileId, u8> = tiles.iter().copied().zip(numbers.iter().copied()).collect();
    let is_hot = |number: u8| number == 6 || number == 8;

    placed
        .iter()
        .filter(|(_, number)| is_hot(**number))
        .all(|(tile, _)| {
            board
                .neighbouring_tiles(*tile)
                .iter()
                .all(|neighbour| !placed.get(neighbour).is_some_and(|n| is_hot(*n)))
        })
}

/// Four 3:1 ports and one 2:1 port per resource, in shuffled order
pub fn standard_port_pool() -> Vec<PortKind> {
    let mut pool = vec![PortKind::Any; 4];
    pool.extend(Resource::ALL.iter().map(|r| PortKind::Specific(*r)));
    pool
}

/// Put up to nine ports on coastal street slots, spread around the island
pub fn add_standard_ports<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) -> Result<(), BoardError> {
    let coastal = board.coastal_streets();
    let mut kinds = standard_port_pool();
    kinds.shuffle(rng);

    let streets = select_distributed_coastal_streets(board, &coastal, STANDARD_PORT_COUNT, rng);
    for (street, kind) in streets.into_iter().zip(kinds) {
        let [a, b] = street.endpoints();
        board.add_port(kind, (a, b))?;
    }
    Ok(())
}

/// Greedy max-min spread of `count` streets by midpoint distance
fn select_distributed_coastal_streets<R: Rng + ?Sized>(
    board: &Board,
    coastal: &[StreetKey],
    count: usize,
    rng: &mut R,
) -> Vec<StreetKey> {
    let mut available = coastal.to_vec();
    available.shuffle(rng);
    if available.len() <= count {
        return available;
    }

    let distance = |a: &StreetKey, b: &StreetKey| match (board.street_midpoint(*a), board.street_midpoint(*b)) {
        (Some(a), Some(b)) => a.distance_to(&b),
        _ => 0.0,
    };

    let mut selected: Vec<StreetKey> = vec![available.remove(0)];
    while selected.len() < count && !available.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (idx, candidate) in available.iter().enumerate() {
            let nearest = selected
                .iter()
                .map(|s| distance(candidate, s))
                .fold(f64::MAX, f64::min);
            if best.map_or(true, |(_, d)| nearest > d) {
                best = Some((idx, nearest));
            }
        }
        match best {
            Some((idx, _)) => selected.push(available.remove(idx)),
            None => break,
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CLASSIC_ROWS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_standard_pools() {
        assert_eq!(standard_terrain_pool().len(), 19);
        assert_eq!(standard_port_pool().len(), STANDARD_PORT_COUNT);
    }

    #[test]
    fn test_classic_terrain_assignment() {
        let mut board = Board::from_rows(&CLASSIC_ROWS);
        let mut rng = StdRng::seed_from_u64(42);
        assign_standard_terrain(&mut board, &mut rng).unwrap();

        let deserts: Vec<_> = board
            .tiles()
            .filter(|t| t.terrain == Terrain::Desert)
            .collect();
        assert_eq!(deserts.len(), 1);
        assert_eq!(deserts[0].dice, None, "Desert should not get a number");

        let mut numbers: Vec<u8> = board.tiles().filter_map(|t| t.dice).collect();
        numbers.sort();
        assert_eq!(numbers, STANDARD_NUMBERS.to_vec());
        assert!(board.tiles().all(|t| t.terrain != Terrain::Missing));
    }

    #[test]
    fn test_no_adjacent_six_and_eight() {
        for seed in 0..10 {
            let mut board = Board::from_rows(&CLASSIC_ROWS);
            let mut rng = StdRng::seed_from_u64(seed);
            assign_standard_terrain(&mut board, &mut rng).unwrap();

            for tile in board.tiles().filter(|t| matches!(t.dice, Some(6) | Some(8))) {
                for neighbour in board.neighbouring_tiles(tile.id) {
                    let dice = board.tile(neighbour).and_then(|t| t.dice);
                    assert!(
                        !matches!(dice, Some(6) | Some(8)),
                        "Seed {}: tiles {} and {} both hot",
                        seed,
                        tile.id,
                        neighbour
                    );
                }
            }
        }
    }

    #[test]
    fn test_small_board_gets_partial_pool() {
        let mut board = Board::from_rows(&[2]);
        let mut rng = StdRng::seed_from_u64(1);
        assign_standard_terrain(&mut board, &mut rng).unwrap();
        assert!(board.tiles().all(|t| t.terrain != Terrain::Missing));
    }

    #[test]
    fn test_standard_ports() {
        let mut board = Board::from_rows(&CLASSIC_ROWS);
        let mut rng = StdRng::seed_from_u64(3);
        add_standard_ports(&mut board, &mut rng).unwrap();

        assert_eq!(board.ports().len(), STANDARD_PORT_COUNT);
        let coastal: HashSet<_> = board.coastal_streets().into_iter().collect();
        for port in board.ports() {
            let key = StreetKey::new(port.slots[0], port.slots[1]);
            assert!(coastal.contains(&key), "Port {} should sit on the coast", key);
        }
        let any = board.ports().iter().filter(|p| p.kind == PortKind::Any).count();
        assert_eq!(any, 4);
    }

    #[test]
    fn test_ports_on_tiny_board() {
        let mut board = Board::from_rows(&[1]);
        let mut rng = StdRng::seed_from_u64(3);
        add_standard_ports(&mut board, &mut rng).unwrap();
        assert_eq!(board.ports().len(), 6);
    }
}
