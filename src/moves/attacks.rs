//! Attack bitboards for every piece kind.
//!
//! Leaper (knight, king, pawn) attacks are precomputed at compile time from
//! their step offsets. Slider attacks walk each ray from the origin and stop
//! at the first occupied square, which is included so captures fall out of
//! the same mask.

use crate::game_state::chess_types::{Color, Square};

const KNIGHT_STEPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const LIGHT_PAWN_STEPS: [(i32, i32); 2] = [(-1, 1), (1, 1)];
const DARK_PAWN_STEPS: [(i32, i32); 2] = [(-1, -1), (1, -1)];

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const KNIGHT_ATTACKS: [u64; 64] = step_table(&KNIGHT_STEPS);
pub const KING_ATTACKS: [u64; 64] = step_table(&KING_STEPS);
pub const PAWN_ATTACKS: [[u64; 64]; 2] = [step_table(&LIGHT_PAWN_STEPS), step_table(&DARK_PAWN_STEPS)];

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

/// Squares a pawn of `color` standing on `square` attacks.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    PAWN_ATTACKS[color.index()][square as usize]
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    slider_attacks(square, occupancy, &ROOK_DIRECTIONS)
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    slider_attacks(square, occupancy, &BISHOP_DIRECTIONS)
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    rook_attacks(square, occupancy) | bishop_attacks(square, occupancy)
}

fn slider_attacks(square: Square, occupancy: u64, directions: &[(i32, i32)]) -> u64 {
    let origin_file = (square % 8) as i32;
    let origin_rank = (square / 8) as i32;
    let mut attacks = 0u64;

    for &(file_step, rank_step) in directions {
        let mut file = origin_file + file_step;
        let mut rank = origin_rank + rank_step;
        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let bit = 1u64 << (rank * 8 + file);
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            file += file_step;
            rank += rank_step;
        }
    }

    attacks
}

const fn step_table<const N: usize>(steps: &[(i32, i32); N]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut i = 0usize;
        while i < N {
            let (df, dr) = steps[i];
            table[sq] |= bit_if_on_board(file + df, rank + dr);
            i += 1;
        }
        sq += 1;
    }

    table
}

const fn bit_if_on_board(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }
    1u64 << (rank * 8 + file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaper_counts_from_center_and_corner() {
        let d4 = 27;
        assert_eq!(knight_attacks(d4).count_ones(), 8);
        assert_eq!(king_attacks(d4).count_ones(), 8);
        assert_eq!(knight_attacks(0).count_ones(), 2);
        assert_eq!(king_attacks(0).count_ones(), 3);
    }

    #[test]
    fn pawn_attacks_point_toward_the_enemy() {
        let e2 = 12;
        assert_eq!(pawn_attacks(Color::Light, e2), (1u64 << 19) | (1u64 << 21));
        let e7 = 52;
        assert_eq!(pawn_attacks(Color::Dark, e7), (1u64 << 43) | (1u64 << 45));
        // a-file pawns only attack one way, last-rank pawns nowhere.
        assert_eq!(pawn_attacks(Color::Light, 8).count_ones(), 1);
        assert_eq!(pawn_attacks(Color::Light, 60), 0);
    }

    #[test]
    fn sliders_stop_on_first_blocker() {
        let a1 = 0;
        let blocker_on_a4 = 1u64 << 24;
        let attacks = rook_attacks(a1, blocker_on_a4);
        assert_ne!(attacks & (1u64 << 24), 0);
        assert_eq!(attacks & (1u64 << 32), 0);
        assert_eq!(rook_attacks(27, 0).count_ones(), 14);
        assert_eq!(bishop_attacks(27, 0).count_ones(), 13);
        assert_eq!(queen_attacks(27, 0).count_ones(), 27);
    }
}
