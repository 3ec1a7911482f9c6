use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::moves::attacks::pawn_attacks;
use crate::moves::chess_move::{ChessMove, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT};

pub fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<ChessMove>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;
    let (start_rank, promotion_rank) = match side {
        Color::Light => (1, 7),
        Color::Dark => (6, 0),
    };

    let mut pawns = game_state.pieces[side.index()][PieceKind::Pawn.index()];
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        if let Some(to) = forward(side, from) {
            if (1u64 << to) & empty != 0 {
                push_with_promotions(out, from, to, None, 0, square_rank(to) == promotion_rank);

                if square_rank(from) == start_rank {
                    if let Some(two_step) = forward(side, to) {
                        if (1u64 << two_step) & empty != 0 {
                            out.push(ChessMove::new(
                                from,
                                two_step,
                                PieceKind::Pawn,
                                None,
                                None,
                                FLAG_DOUBLE_PAWN_PUSH,
                            ));
                        }
                    }
                }
            }
        }

        let mut targets = pawn_attacks(side, from);
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            targets &= targets - 1;

            if (1u64 << to) & enemy_occ != 0 {
                push_with_promotions(
                    out,
                    from,
                    to,
                    enemy_piece_on(game_state, to),
                    FLAG_CAPTURE,
                    square_rank(to) == promotion_rank,
                );
            } else if game_state.en_passant_square == Some(to) {
                out.push(ChessMove::new(
                    from,
                    to,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    FLAG_CAPTURE | FLAG_EN_PASSANT,
                ));
            }
        }
    }
}

#[inline]
fn forward(side: Color, square: Square) -> Option<Square> {
    match side {
        Color::Light => square.checked_add(8).filter(|sq| *sq < 64),
        Color::Dark => square.checked_sub(8),
    }
}

fn push_with_promotions(
    out: &mut Vec<ChessMove>,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    flags: u8,
    promotes: bool,
) {
    if promotes {
        for promo in PieceKind::PROMOTIONS {
            out.push(ChessMove::new(from, to, PieceKind::Pawn, captured, Some(promo), flags));
        }
    } else {
        out.push(ChessMove::new(from, to, PieceKind::Pawn, captured, None, flags));
    }
}
