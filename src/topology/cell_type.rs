//! Simplex cell types and their reference-cell topology.
//!
//! Local entities of dimension `d > 0` are the `(d + 1)`-vertex subsets of the
//! reference cell, enumerated in reverse lexicographic order. With that
//! convention local facet `i` is the facet opposite local vertex `i`, and the
//! edges of a tetrahedron come out as `23, 13, 12, 03, 02, 01`.

use itertools::Itertools;

/// Simplicial cell types supported by the built-in mesh and descriptors.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// 0D vertex.
    #[default]
    Point,
    /// 1D segment.
    Interval,
    /// 2D simplex.
    Triangle,
    /// 3D simplex.
    Tetrahedron,
}

impl CellType {
    /// Cell type of the simplex with topological dimension `dim`.
    pub fn from_dimension(dim: usize) -> Option<Self> {
        match dim {
            0 => Some(CellType::Point),
            1 => Some(CellType::Interval),
            2 => Some(CellType::Triangle),
            3 => Some(CellType::Tetrahedron),
            _ => None,
        }
    }

    /// Topological dimension of the cell.
    pub fn dimension(self) -> usize {
        match self {
            CellType::Point => 0,
            CellType::Interval => 1,
            CellType::Triangle => 2,
            CellType::Tetrahedron => 3,
        }
    }

    /// Number of vertices of the cell.
    pub fn num_vertices(self) -> usize {
        self.dimension() + 1
    }

    /// Number of facets, i.e. entities of dimension `dimension() - 1`.
    pub fn num_facets(self) -> usize {
        match self {
            CellType::Point => 0,
            other => other.num_vertices(),
        }
    }

    /// Number of local entities of dimension `dim` (binomial `C(n+1, dim+1)`).
    pub fn num_entities(self, dim: usize) -> usize {
        if dim > self.dimension() {
            return 0;
        }
        binomial(self.num_vertices(), dim + 1)
    }

    /// Local vertex lists of every entity of dimension `dim`, in reference order.
    pub fn local_entities(self, dim: usize) -> Vec<Vec<usize>> {
        if dim > self.dimension() {
            return Vec::new();
        }
        let mut entities: Vec<Vec<usize>> = (0..self.num_vertices())
            .combinations(dim + 1)
            .collect();
        if dim > 0 {
            entities.reverse();
        }
        entities
    }

    /// Local entities of dimension `dim` lying in the closure of `local_facet`.
    ///
    /// Returns the local entity numbers (positions in [`local_entities`](Self::local_entities)).
    pub fn facet_closure(self, local_facet: usize, dim: usize) -> Vec<usize> {
        if local_facet >= self.num_facets() || dim >= self.dimension() {
            return Vec::new();
        }
        self.local_entities(dim)
            .iter()
            .enumerate()
            .filter(|(_, verts)| !verts.contains(&local_facet))
            .map(|(e, _)| e)
            .collect()
    }
}

/// Binomial coefficient `C(n, k)`.
pub(crate) fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}
