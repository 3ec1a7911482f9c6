//! Zobrist keys for position identity.
//!
//! Keys cover piece placement, side to move, castling rights and the
//! en-passant file. The en-passant file only contributes when a pawn of the
//! side to move could actually capture there, so two positions that differ
//! only by an unusable en-passant target count as repetitions of each other.
//! Tables come from a fixed seed and are identical across runs.

use std::sync::OnceLock;

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::attacks::pawn_attacks;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for piece in color {
            for key in piece {
                *key = splitmix64(&mut seed);
            }
        }
    }

    let side_to_move = splitmix64(&mut seed);
    let castling = std::array::from_fn(|_| splitmix64(&mut seed));
    let en_passant_file = std::array::from_fn(|_| splitmix64(&mut seed));

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
        en_passant_file,
    }
}

#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Compute the position key from scratch.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let tables = tables();
    let mut key = 0u64;

    for color in Color::BOTH {
        for kind in PieceKind::ALL {
            let mut bb = game_state.pieces[color.index()][kind.index()];
            while bb != 0 {
                let sq = bb.trailing_zeros() as usize;
                key ^= tables.piece_square[color.index()][kind.index()][sq];
                bb &= bb - 1;
            }
        }
    }

    if game_state.side_to_move == Color::Dark {
        key ^= tables.side_to_move;
    }

    key ^= tables.castling[(game_state.castling_rights & CASTLE_ALL) as usize];

    if let Some(ep_square) = game_state.en_passant_square {
        if en_passant_is_capturable(game_state, ep_square) {
            key ^= tables.en_passant_file[square_file(ep_square) as usize];
        }
    }

    key
}

fn en_passant_is_capturable(game_state: &GameState, ep_square: Square) -> bool {
    if ep_square > 63 {
        return false;
    }
    let mover = game_state.side_to_move;
    let our_pawns = game_state.pieces[mover.index()][PieceKind::Pawn.index()];
    // Squares a pawn of `mover` must stand on to attack the target.
    pawn_attacks(mover.opposite(), ep_square) & our_pawns != 0
}
