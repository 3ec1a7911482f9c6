//! Perft node counting used to validate move generation against published
//! reference counts.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::LegalMoveGenerator;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }
}

/// Count leaf positions `depth` plies below `game_state`, tallying the
/// kind of move that reached each leaf.
pub fn perft<G: MoveGenerator>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for generated in generator.generate_legal_moves(game_state)? {
        if depth == 1 {
            let mv = generated.mv;
            let next = &generated.game_after_move;
            total.merge(PerftCounts {
                nodes: 1,
                captures: u64::from(mv.is_capture()),
                en_passant: u64::from(mv.is_en_passant()),
                castles: u64::from(mv.is_castling()),
                promotions: u64::from(mv.is_promotion()),
                checks: u64::from(is_king_in_check(next, next.side_to_move)),
            });
        } else {
            total.merge(perft(generator, &generated.game_after_move, depth - 1)?);
        }
    }

    Ok(total)
}

#[inline]
pub fn perft_legal(game_state: &GameState, depth: u8) -> MoveGenResult<PerftCounts> {
    perft(&LegalMoveGenerator, game_state, depth)
}
