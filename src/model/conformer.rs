/// One set of per-atom coordinates, indexed like the owning molecule's atoms.
///
/// 2D conformers keep `z == 0.0`; the `is_3d` flag only decides the
/// dimension code written on the program line.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    pub id: u32,
    pub positions: Vec<[f64; 3]>,
    pub is_3d: bool,
}

impl Conformer {
    pub fn new_3d(id: u32, positions: Vec<[f64; 3]>) -> Self {
        Self {
            id,
            positions,
            is_3d: true,
        }
    }

    pub fn new_2d(id: u32, positions: Vec<[f64; 2]>) -> Self {
        Self {
            id,
            positions: positions.into_iter().map(|[x, y]| [x, y, 0.0]).collect(),
            is_3d: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, atom: usize) -> Option<[f64; 3]> {
        self.positions.get(atom).copied()
    }
}
