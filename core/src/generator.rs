use ndarray::Array2;
use rand::Rng;

use crate::*;

/// Places `config.mines` mines on distinct cells by rejection sampling.
///
/// The config guarantees at least one free cell, so the loop terminates.
pub fn place_random_mines<R: Rng + ?Sized>(config: BoardConfig, rng: &mut R) -> Array2<bool> {
    let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
    let (rows, columns) = config.size;

    let mut placed = 0;
    let mut rejected = 0u64;
    while placed < config.mines {
        let coords = (rng.random_range(0..rows), rng.random_range(0..columns));
        let cell = &mut mine_mask[coords.to_nd_index()];
        if *cell {
            rejected += 1;
            continue;
        }
        *cell = true;
        placed += 1;
    }

    log::trace!(
        "placed {} mines on {}x{}, {} rejected samples",
        placed,
        rows,
        columns,
        rejected
    );
    mine_mask
}

/// Mine count of every cell's Moore neighborhood, 0 for the mines themselves.
pub fn adjacency_counts(mine_mask: &Array2<bool>) -> Array2<u8> {
    let mut counts = Array2::zeros(mine_mask.dim());
    for ((row, col), &is_mine) in mine_mask.indexed_iter() {
        if is_mine {
            continue;
        }
        let coords = (row as Coord, col as Coord);
        counts[[row, col]] = mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| mine_mask[pos.to_nd_index()])
            .count() as u8;
    }
    counts
}
