//! Piece catalog and shape matrices.

use crate::error::GameError;

/// Cell value: 0 is empty, 1..=7 is a locked piece colour.
pub type Cell = u8;

const SHAPE_O: &[&[Cell]] = &[&[1, 1], &[1, 1]];
const SHAPE_I: &[&[Cell]] = &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]];
const SHAPE_S: &[&[Cell]] = &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]];
const SHAPE_Z: &[&[Cell]] = &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]];
const SHAPE_L: &[&[Cell]] = &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]];
const SHAPE_J: &[&[Cell]] = &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]];
const SHAPE_T: &[&[Cell]] = &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]];

const fn is_square(shape: &[&[Cell]]) -> bool {
    let mut y = 0;
    while y < shape.len() {
        if shape[y].len() != shape.len() {
            return false;
        }
        y += 1;
    }
    true
}

// In-place rotation only works on square matrices, and every matrix starts
// from one of these templates.
const _: () = {
    assert!(is_square(SHAPE_O));
    assert!(is_square(SHAPE_I));
    assert!(is_square(SHAPE_S));
    assert!(is_square(SHAPE_Z));
    assert!(is_square(SHAPE_L));
    assert!(is_square(SHAPE_J));
    assert!(is_square(SHAPE_T));
};

/// Tetromino kinds (O, I, S, Z, L, J, T).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    O,
    I,
    S,
    Z,
    L,
    J,
    T,
}

impl PieceKind {
    /// Spawn order used for the random draw.
    pub const ALL: [Self; 7] = [Self::O, Self::I, Self::S, Self::Z, Self::L, Self::J, Self::T];

    /// Shape template; never mutated, copied by [`create_piece`].
    pub fn template(&self) -> &'static [&'static [Cell]] {
        match self {
            Self::O => SHAPE_O,
            Self::I => SHAPE_I,
            Self::S => SHAPE_S,
            Self::Z => SHAPE_Z,
            Self::L => SHAPE_L,
            Self::J => SHAPE_J,
            Self::T => SHAPE_T,
        }
    }

    /// Colour index written into the arena when the piece locks.
    pub fn color(&self) -> Cell {
        match self {
            Self::O => 1,
            Self::I => 2,
            Self::Z => 3,
            Self::S => 4,
            Self::L => 5,
            Self::J => 6,
            Self::T => 7,
        }
    }

    pub fn token(&self) -> char {
        match self {
            Self::O => 'O',
            Self::I => 'I',
            Self::S => 'S',
            Self::Z => 'Z',
            Self::L => 'L',
            Self::J => 'J',
            Self::T => 'T',
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = GameError;

    fn try_from(token: char) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.token() == token)
            .ok_or(GameError::InvalidPieceType(token))
    }
}

/// Square 0/1 shape matrix. `rows[y][x]`, y=0 is top. Only built from the
/// piece templates, so it stays square through every rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vec<Cell>>,
}

impl Matrix {
    fn from_template(template: &[&[Cell]]) -> Self {
        Self {
            rows: template.iter().map(|row| row.to_vec()).collect(),
        }
    }

    /// Side length; width and height are equal.
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Nonzero cells as (x, y, value), matrix-relative.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0)
                .map(move |(x, &v)| (x, y, v))
        })
    }

    /// Rotate 90° in place: clockwise when `direction > 0`, counter-clockwise otherwise.
    pub fn rotate(&mut self, direction: i32) {
        let n = self.size();
        debug_assert!(self.rows.iter().all(|row| row.len() == n));
        for y in 0..n {
            for x in 0..y {
                let tmp = self.rows[x][y];
                self.rows[x][y] = self.rows[y][x];
                self.rows[y][x] = tmp;
            }
        }
        if direction > 0 {
            for row in &mut self.rows {
                row.reverse();
            }
        } else {
            self.rows.reverse();
        }
    }
}

/// Freshly created piece: an owned copy of the template plus its colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub matrix: Matrix,
    pub color: Cell,
}

pub fn create_piece(kind: PieceKind) -> Piece {
    Piece {
        kind,
        matrix: Matrix::from_template(kind.template()),
        color: kind.color(),
    }
}

/// Parse a piece letter from the command line.
pub fn parse_piece_kind(s: &str) -> Result<PieceKind, GameError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PieceKind::try_from(c.to_ascii_uppercase()),
        (Some(c), Some(_)) => Err(GameError::InvalidPieceType(c)),
        (None, _) => Err(GameError::InvalidPieceType(' ')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_colors() {
        let colors: Vec<Cell> = PieceKind::ALL.iter().map(PieceKind::color).collect();
        assert_eq!(colors, vec![1, 2, 4, 3, 5, 6, 7]);
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(create_piece(PieceKind::O).matrix.size(), 2);
        assert_eq!(create_piece(PieceKind::I).matrix.size(), 4);
        for kind in [PieceKind::S, PieceKind::Z, PieceKind::L, PieceKind::J, PieceKind::T] {
            assert_eq!(create_piece(kind).matrix.size(), 3);
        }
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(create_piece(kind).matrix.occupied().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_create_piece_is_independent_copy() {
        let mut a = create_piece(PieceKind::T);
        a.matrix.rotate(1);
        let b = create_piece(PieceKind::T);
        assert_ne!(a.matrix, b.matrix);
        assert_eq!(b.matrix.rows()[0], vec![0, 1, 0]);
    }

    #[test]
    fn test_token_lookup() {
        let piece = create_piece(PieceKind::try_from('Z').unwrap());
        assert_eq!(piece.kind, PieceKind::Z);
        assert_eq!(piece.color, 3);
        assert_eq!(PieceKind::try_from('X'), Err(GameError::InvalidPieceType('X')));
        assert!(PieceKind::try_from('t').is_err());
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::try_from(kind.token()), Ok(kind));
        }
    }

    #[test]
    fn test_parse_piece_kind() {
        assert_eq!(parse_piece_kind("T"), Ok(PieceKind::T));
        assert_eq!(parse_piece_kind("i"), Ok(PieceKind::I));
        assert_eq!(parse_piece_kind("X"), Err(GameError::InvalidPieceType('X')));
        assert!(parse_piece_kind("").is_err());
        assert!(parse_piece_kind("TT").is_err());
    }

    #[test]
    fn test_rotate_clockwise() {
        let mut m = create_piece(PieceKind::L).matrix;
        m.rotate(1);
        assert_eq!(m.rows(), &[vec![0, 1, 1], vec![0, 1, 0], vec![0, 1, 0]]);
    }

    #[test]
    fn test_rotate_counter_clockwise() {
        let mut m = create_piece(PieceKind::L).matrix;
        m.rotate(-1);
        assert_eq!(m.rows(), &[vec![0, 1, 0], vec![0, 1, 0], vec![1, 1, 0]]);
    }

    #[test]
    fn test_rotation_round_trip_all_shapes() {
        for kind in PieceKind::ALL {
            let original = create_piece(kind).matrix;
            let mut m = original.clone();
            m.rotate(1);
            m.rotate(-1);
            m.rotate(-1);
            m.rotate(1);
            assert_eq!(m, original, "{kind:?}");

            for _ in 0..4 {
                m.rotate(1);
            }
            assert_eq!(m, original, "{kind:?} four clockwise turns");
        }
    }

    #[test]
    fn test_templates_are_square() {
        for kind in PieceKind::ALL {
            assert!(is_square(kind.template()), "{kind:?}");
            let mut m = create_piece(kind).matrix;
            for _ in 0..3 {
                m.rotate(1);
                assert!(m.rows().iter().all(|row| row.len() == m.size()), "{kind:?}");
            }
        }
        assert!(!is_square(&[&[1, 1, 1], &[0, 1, 0]]));
    }
}
