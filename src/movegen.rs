// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-piece move generation for the side to move.
//!
//! The generators here are pin-aware: a piece pinned to its king only produces moves along the pin. King moves and
//! en-passant captures are checked for legality on the spot. Nothing here looks at checks, though; narrowing a move
//! list down to the moves that answer a check is done by `GameState::legal_moves`.

use crate::{
    analysis::{self, Analysis},
    core::*,
    GameState,
};

pub fn generate_pawn_moves(
    pos: &GameState,
    analysis: &Analysis,
    from: Square,
    moves: &mut Vec<Move>,
) {
    let board = pos.board();
    let us = pos.side_to_move();
    let pawn = Piece::new(us, PieceKind::Pawn);
    let forward = us.forward();
    let pin = analysis.pin_on(from);
    let allowed = |cols: i8| pin.map_or(true, |dir| dir.is_along(forward, cols));

    // Single and double pushes.
    if let Some(one) = from.offset(forward, 0) {
        if board.is_vacant(one) && allowed(0) {
            push_pawn_move(board, from, one, pawn, moves);
            if from.row() == us.pawn_row() {
                if let Some(two) = one.offset(forward, 0) {
                    if board.is_vacant(two) {
                        moves.push(Move::snapshot(board, from, two, pawn, MoveKind::Normal));
                    }
                }
            }
        }
    }

    // Captures, including en passant.
    for cols in [-1, 1] {
        let target = match from.offset(forward, cols) {
            Some(target) => target,
            None => continue,
        };

        if !allowed(cols) {
            continue;
        }

        match board.piece_at(target) {
            Some(piece) if piece.color != us => push_pawn_move(board, from, target, pawn, moves),
            None if pos.en_passant_target() == Some(target) => {
                let mov = Move::snapshot(board, from, target, pawn, MoveKind::EnPassant);
                if en_passant_is_safe(pos, mov) {
                    moves.push(mov);
                }
            }
            _ => {}
        }
    }
}

/// Pushes a pawn move, expanding it into one move per promotion choice if it lands on the far row.
fn push_pawn_move(board: &Board, from: Square, to: Square, pawn: Piece, moves: &mut Vec<Move>) {
    if to.row() == pawn.color.promotion_row() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::snapshot(
                board,
                from,
                to,
                pawn,
                MoveKind::Promotion(kind),
            ));
        }
    } else {
        moves.push(Move::snapshot(board, from, to, pawn, MoveKind::Normal));
    }
}

/// En passant removes two pawns from the capturing pawn's row at once, which can expose the king along that row in
/// a way the pin scan never sees. Settle it by playing the capture out on a scratch board.
fn en_passant_is_safe(pos: &GameState, mov: Move) -> bool {
    let us = pos.side_to_move();
    let mut scratch = pos.board().clone();
    scratch.take(mov.start());
    scratch.take(mov.capture_square());
    scratch.put(mov.end(), mov.piece_moved());
    !analysis::is_attacked(&scratch, us, pos.king_square(us))
}

pub fn generate_knight_moves(
    pos: &GameState,
    analysis: &Analysis,
    from: Square,
    moves: &mut Vec<Move>,
) {
    // A pinned knight can never stay on its pin line.
    if analysis.pin_on(from).is_some() {
        return;
    }

    let board = pos.board();
    let us = pos.side_to_move();
    let knight = Piece::new(us, PieceKind::Knight);
    for (rows, cols) in KNIGHT_OFFSETS {
        if let Some(target) = from.offset(rows, cols) {
            if board.piece_at(target).map_or(true, |piece| piece.color != us) {
                moves.push(Move::snapshot(board, from, target, knight, MoveKind::Normal));
            }
        }
    }
}

pub fn generate_bishop_moves(
    pos: &GameState,
    analysis: &Analysis,
    from: Square,
    moves: &mut Vec<Move>,
) {
    generate_sliding_moves(pos, analysis, from, &Direction::DIAGONAL, moves);
}

pub fn generate_rook_moves(
    pos: &GameState,
    analysis: &Analysis,
    from: Square,
    moves: &mut Vec<Move>,
) {
    generate_sliding_moves(pos, analysis, from, &Direction::ORTHOGONAL, moves);
}

pub fn generate_queen_moves(
    pos: &GameState,
    analysis: &Analysis,
    from: Square,
    moves: &mut Vec<Move>,
) {
    generate_rook_moves(pos, analysis, from, moves);
    generate_bishop_moves(pos, analysis, from, moves);
}

fn generate_sliding_moves(
    pos: &GameState,
    analysis: &Analysis,
    from: Square,
    directions: &[Direction],
    moves: &mut Vec<Move>,
) {
    let board = pos.board();
    let us = pos.side_to_move();
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return,
    };

    let pin = analysis.pin_on(from);
    for &dir in directions {
        if let Some(pin_dir) = pin {
            if pin_dir != dir && pin_dir != dir.reverse() {
                continue;
            }
        }

        let mut cursor = from;
        while let Some(target) = cursor.towards(dir) {
            cursor = target;
            match board.piece_at(target) {
                None => moves.push(Move::snapshot(board, from, target, piece, MoveKind::Normal)),
                Some(other) => {
                    if other.color != us {
                        moves.push(Move::snapshot(board, from, target, piece, MoveKind::Normal));
                    }

                    break;
                }
            }
        }
    }
}

/// Generates king steps to every adjacent square that the king could stand on without being attacked.
pub fn generate_king_moves(pos: &GameState, from: Square, moves: &mut Vec<Move>) {
    let board = pos.board();
    let us = pos.side_to_move();
    let king = Piece::new(us, PieceKind::King);
    for dir in Direction::ALL {
        let target = match from.towards(dir) {
            Some(target) => target,
            None => continue,
        };

        if board.piece_at(target).map_or(false, |piece| piece.color == us) {
            continue;
        }

        if !analysis::is_attacked(board, us, target) {
            moves.push(Move::snapshot(board, from, target, king, MoveKind::Normal));
        }
    }
}

/// Generates castles for the side to move. Callers must only ask for these when the side to move is not in check.
pub fn generate_castle_moves(pos: &GameState, moves: &mut Vec<Move>) {
    let board = pos.board();
    let us = pos.side_to_move();
    let rights = pos.castle_rights();
    let king = Piece::new(us, PieceKind::King);
    let rook = Piece::new(us, PieceKind::Rook);
    let home = us.home_row();
    let from = Square::at(home, 4);
    if pos.king_square(us) != from {
        return;
    }

    let vacant = |cols: &[u8]| cols.iter().all(|&col| board.is_vacant(Square::at(home, col)));
    let safe = |cols: &[u8]| {
        cols.iter()
            .all(|&col| !analysis::is_attacked(board, us, Square::at(home, col)))
    };

    if rights.can_castle_kingside(us)
        && board.piece_at(Square::at(home, 7)) == Some(rook)
        && vacant(&[5, 6])
        && safe(&[5, 6])
    {
        let to = Square::at(home, 6);
        moves.push(Move::snapshot(board, from, to, king, MoveKind::Castle));
    }

    if rights.can_castle_queenside(us)
        && board.piece_at(Square::at(home, 0)) == Some(rook)
        && vacant(&[1, 2, 3])
        && safe(&[2, 3])
    {
        let to = Square::at(home, 2);
        moves.push(Move::snapshot(board, from, to, king, MoveKind::Castle));
    }
}

/// Generates every pin-aware move for the side to move, except castles.
pub fn generate_moves(pos: &GameState, analysis: &Analysis, moves: &mut Vec<Move>) {
    let us = pos.side_to_move();
    for (from, piece) in pos.board().pieces_of(us) {
        match piece.kind {
            PieceKind::Pawn => generate_pawn_moves(pos, analysis, from, moves),
            PieceKind::Knight => generate_knight_moves(pos, analysis, from, moves),
            PieceKind::Bishop => generate_bishop_moves(pos, analysis, from, moves),
            PieceKind::Rook => generate_rook_moves(pos, analysis, from, moves),
            PieceKind::Queen => generate_queen_moves(pos, analysis, from, moves),
            PieceKind::King => generate_king_moves(pos, from, moves),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::analysis::analyze;

    fn position(rows: [&str; 8], side: Color) -> GameState {
        GameState::from_board(Board::from_rows(rows), side, CastleRights::NONE).unwrap()
    }

    fn generated(pos: &GameState) -> HashSet<String> {
        let us = pos.side_to_move();
        let analysis = analyze(pos.board(), us, pos.king_square(us));
        let mut moves = Vec::new();
        generate_moves(pos, &analysis, &mut moves);
        generate_castle_moves(pos, &mut moves);
        moves.iter().map(|m| m.to_string()).collect()
    }

    fn assert_moves_contains(pos: &GameState, expected: &[&str]) {
        let moves = generated(pos);
        for mov in expected {
            assert!(moves.contains(*mov), "expected {} in {:?}", mov, moves);
        }
    }

    fn assert_moves_does_not_contain(pos: &GameState, unexpected: &[&str]) {
        let moves = generated(pos);
        for mov in unexpected {
            assert!(!moves.contains(*mov), "did not expect {} in {:?}", mov, moves);
        }
    }

    mod pawns {
        use super::*;

        #[test]
        fn white_pawn_pushes() {
            let pos = position(
                [
                    "....k...", "........", "........", "........", "........", "........",
                    "P.......", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["a2a3", "a2a4"]);
        }

        #[test]
        fn black_pawn_pushes() {
            let pos = position(
                [
                    "....k...", "...p....", "........", "........", "........", "........",
                    "........", "....K...",
                ],
                Color::Black,
            );
            assert_moves_contains(&pos, &["d7d6", "d7d5"]);
        }

        #[test]
        fn no_double_push_when_blocked() {
            let pos = position(
                [
                    "....k...", "........", "........", "........", "P.......", "........",
                    "P.......", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["a2a3"]);
            assert_moves_does_not_contain(&pos, &["a2a4"]);

            let pos = position(
                [
                    "....k...", "........", "........", "........", "........", "n.......",
                    "P.......", "....K...",
                ],
                Color::White,
            );
            assert_moves_does_not_contain(&pos, &["a2a3", "a2a4"]);
        }

        #[test]
        fn double_push_only_from_start_row() {
            let pos = position(
                [
                    "....k...", "........", "........", "........", "........", "P.......",
                    "........", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["a3a4"]);
            assert_moves_does_not_contain(&pos, &["a3a5"]);
        }

        #[test]
        fn captures() {
            let pos = position(
                [
                    "....k...", "........", "........", "...pNp..", "....P...", "........",
                    "........", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["e4d5", "e4f5"]);
            assert_moves_does_not_contain(&pos, &["e4e5"]);
        }

        #[test]
        fn promotions() {
            let pos = position(
                [
                    ".n..k...", "P.......", "........", "........", "........", "........",
                    "........", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(
                &pos,
                &[
                    "a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n",
                ],
            );
            assert_moves_does_not_contain(&pos, &["a7a8"]);
        }

        #[test]
        fn vertically_pinned_pawn_may_push_but_not_capture() {
            let pos = position(
                [
                    "....r..k", "........", "........", "........", "........", "...p....",
                    "....P...", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["e2e3", "e2e4"]);
            assert_moves_does_not_contain(&pos, &["e2d3"]);
        }

        #[test]
        fn diagonally_pinned_pawn_may_only_capture_pinner() {
            let pos = position(
                [
                    ".......k", "........", "........", "........", "........", "......b.",
                    ".....P..", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["f2g3"]);
            assert_moves_does_not_contain(&pos, &["f2f3", "f2f4"]);
        }

        #[test]
        fn horizontally_pinned_en_passant() {
            // Capturing en passant would clear both pawns off of the fifth rank and expose the king to the rook.
            let mut pos = position(
                [
                    "....k...", "...p....", "........", "K...P..r", "........", "........",
                    "........", "........",
                ],
                Color::Black,
            );
            pos.apply_move(pos.find_move(D7, D5, None).unwrap()).unwrap();
            assert_eq!(Some(D6), pos.en_passant_target());
            assert_moves_does_not_contain(&pos, &["e5d6"]);
            assert_moves_contains(&pos, &["e5e6"]);
        }
    }

    mod knights {
        use super::*;

        #[test]
        fn smoke_test() {
            let pos = position(
                [
                    "....k...", "........", "........", "........", "...N....", "........",
                    "........", "....K...",
                ],
                Color::White,
            );
            let expected = [
                "d4b5", "d4b3", "d4c6", "d4e6", "d4f5", "d4f3", "d4c2", "d4e2",
            ];
            assert_moves_contains(&pos, &expected);
            assert_eq!(
                8,
                generated(&pos).iter().filter(|m| m.starts_with("d4")).count()
            );
        }

        #[test]
        fn pinned_knight_has_no_moves() {
            let pos = position(
                [
                    "....r..k", "........", "........", "........", "........", "........",
                    "....N...", "....K...",
                ],
                Color::White,
            );
            assert!(generated(&pos).iter().all(|m| !m.starts_with("e2")));
        }
    }

    mod sliders {
        use super::*;

        #[test]
        fn bishop_smoke_test() {
            let pos = position(
                [
                    "k.......", "........", "..p.p...", "...B....", "..P.p...", "........",
                    "........", ".......K",
                ],
                Color::White,
            );
            let bishop: HashSet<String> = generated(&pos)
                .into_iter()
                .filter(|m| m.starts_with("d5"))
                .collect();
            let expected: HashSet<String> = ["d5c6", "d5e6", "d5e4"]
                .iter()
                .map(|s| s.to_string())
                .collect();
            assert_eq!(expected, bishop);
        }

        #[test]
        fn rook_stops_at_first_piece() {
            let pos = position(
                [
                    ".......k", "........", "........", "........", "R..p....", "........",
                    "P.......", ".......K",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["a4b4", "a4c4", "a4d4", "a4a3", "a4a8"]);
            assert_moves_does_not_contain(&pos, &["a4e4", "a4a2", "a4a1"]);
        }

        #[test]
        fn pinned_rook_slides_along_pin() {
            let pos = position(
                [
                    "....r..k", "........", "........", "........", "........", "....R...",
                    "........", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["e3e2", "e3e4", "e3e8"]);
            assert_moves_does_not_contain(&pos, &["e3d3", "e3f3"]);
        }

        #[test]
        fn queen_combines_rook_and_bishop() {
            let pos = position(
                [
                    "k.......", "........", "........", "........", "...Q....", "........",
                    "........", ".......K",
                ],
                Color::White,
            );
            let queen = generated(&pos)
                .into_iter()
                .filter(|m| m.starts_with("d4"))
                .count();
            assert_eq!(27, queen);
        }

        #[test]
        fn diagonally_pinned_queen() {
            let pos = position(
                [
                    ".......k", "........", "........", ".......b", "........", ".....Q..",
                    "........", "...K....",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["f3e2", "f3g4", "f3h5"]);
            assert_moves_does_not_contain(&pos, &["f3f4", "f3g3", "f3e4"]);
        }
    }

    mod kings {
        use super::*;

        #[test]
        fn king_avoids_attacked_squares() {
            let pos = position(
                [
                    "...r...k", "........", "........", "........", "........", "........",
                    "........", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["e1e2", "e1f1", "e1f2"]);
            assert_moves_does_not_contain(&pos, &["e1d1", "e1d2"]);
        }

        #[test]
        fn king_cannot_retreat_along_checking_line() {
            let pos = position(
                [
                    "....r..k", "........", "........", "........", "........", "........",
                    "....K...", "........",
                ],
                Color::White,
            );
            assert_moves_does_not_contain(&pos, &["e2e1", "e2e3"]);
            assert_moves_contains(&pos, &["e2d1", "e2f3"]);
        }

        #[test]
        fn kings_keep_their_distance() {
            let pos = position(
                [
                    "........", "........", "........", "....k...", "........", "....K...",
                    "........", "........",
                ],
                Color::White,
            );
            assert_moves_does_not_contain(&pos, &["e3d4", "e3e4", "e3f4"]);
            assert_moves_contains(&pos, &["e3d3", "e3f2"]);
        }

        #[test]
        fn king_may_capture_undefended_piece() {
            let pos = position(
                [
                    ".......k", "........", "........", "........", "........", "........",
                    "...q....", "....K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["e1d2"]);

            let pos = position(
                [
                    ".......k", "........", "........", "........", "........", ".n......",
                    "...q....", "....K...",
                ],
                Color::White,
            );
            assert_moves_does_not_contain(&pos, &["e1d2"]);
        }
    }

    mod castles {
        use super::*;

        fn castling_position(rows: [&str; 8], side: Color) -> GameState {
            GameState::from_board(
                Board::from_rows(rows),
                side,
                CastleRights::WHITE | CastleRights::BLACK,
            )
            .unwrap()
        }

        #[test]
        fn both_sides() {
            let pos = castling_position(
                [
                    "r...k..r", "........", "........", "........", "........", "........",
                    "........", "R...K..R",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["e1g1", "e1c1"]);

            let pos = castling_position(
                [
                    "r...k..r", "........", "........", "........", "........", "........",
                    "........", "R...K..R",
                ],
                Color::Black,
            );
            assert_moves_contains(&pos, &["e8g8", "e8c8"]);
        }

        #[test]
        fn blocked() {
            let pos = castling_position(
                [
                    "r...k..r", "........", "........", "........", "........", "........",
                    "........", "RN..K.NR",
                ],
                Color::White,
            );
            assert_moves_does_not_contain(&pos, &["e1g1", "e1c1"]);
        }

        #[test]
        fn through_attacked_square() {
            // The rook on f8 covers f1, which the king must cross to castle kingside.
            let pos = castling_position(
                [
                    "....kr..", "........", "........", "........", "........", "........",
                    "........", "R...K..R",
                ],
                Color::White,
            );
            assert_moves_does_not_contain(&pos, &["e1g1"]);
            assert_moves_contains(&pos, &["e1c1"]);
        }

        #[test]
        fn queenside_b_file_may_be_attacked() {
            // Only the squares the king crosses have to be safe; b1 merely has to be empty.
            let pos = castling_position(
                [
                    ".r..k...", "........", "........", "........", "........", "........",
                    "........", "R...K...",
                ],
                Color::White,
            );
            assert_moves_contains(&pos, &["e1c1"]);
        }

        #[test]
        fn requires_rights() {
            let pos = GameState::from_board(
                Board::from_rows([
                    "r...k..r", "........", "........", "........", "........", "........",
                    "........", "R...K..R",
                ]),
                Color::White,
                CastleRights::WHITE_QUEENSIDE,
            )
            .unwrap();
            assert_moves_does_not_contain(&pos, &["e1g1"]);
            assert_moves_contains(&pos, &["e1c1"]);
        }

        #[test]
        fn requires_rook_on_corner() {
            let pos = castling_position(
                [
                    "r...k..r", "........", "........", "........", "........", "........",
                    "........", "....K..B",
                ],
                Color::White,
            );
            assert_moves_does_not_contain(&pos, &["e1g1", "e1c1"]);
        }
    }
}
