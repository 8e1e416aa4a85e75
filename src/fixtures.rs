//! Hand-checked endgame positions shared by unit tests.

/// Black to move with a1, b1, b2 and f2 empty. f2 wins by 22; b1 and b2
/// both lose by 12.
pub(crate) const FOUR_EMPTY: &str = "..BBBBWB\n\
                                     B.WWB.WB\n\
                                     BWWWBBWB\n\
                                     BWBBWBWB\n\
                                     BWWWBWWB\n\
                                     BWBWWBWB\n\
                                     BWWWWWBB\n\
                                     BWWBBBBB";

/// Black has no move. White to move: e1 and b8 both score +40, a8 +30.
pub(crate) const BLACK_PASSES: &str = "WWWW.BWW\n\
                                       WWBBBWWW\n\
                                       WBWBWBWW\n\
                                       WWBWWBWW\n\
                                       WBWWWBWW\n\
                                       WBBWWWWW\n\
                                       WBBBBWWW\n\
                                       ..BBBWWW";
