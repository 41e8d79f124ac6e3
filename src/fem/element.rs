//! Descriptor for elements with a fixed number of dofs per mesh entity.
//!
//! Covers Lagrange `P_k` on simplices and discontinuous `P0`. The local
//! layout is ordered by entity dimension, then by local entity (reference
//! order, see [`CellType::local_entities`]), then by dof on the entity.

use crate::fem::descriptor::ElementDofDescriptor;
use crate::topology::cell::CellView;
use crate::topology::cell_type::{CellType, binomial};
use crate::topology::summary::MeshSummary;

/// How global dofs are assigned to mesh entities.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Numbering {
    /// Dofs grouped by entity dimension, then by entity index:
    /// `sum_{d' < d}(N_d' * n_d') + entity * n_d + k`. No per-cell pass.
    #[default]
    Entity,
    /// Entities numbered the first time a cell touches them, in ascending
    /// cell order. Requires the per-cell initialization pass.
    FirstTouch,
}

/// Element with `dofs_per_entity[d]` dofs on every entity of dimension `d`.
#[derive(Clone, Debug)]
pub struct EntityDofDescriptor {
    family: String,
    cell_type: CellType,
    dofs_per_entity: Vec<usize>,
    numbering: Numbering,
    initialized: bool,
    num_entities: Vec<usize>,
    /// First dof of each touched entity, per dimension (first-touch numbering).
    first_dof: Vec<Vec<Option<usize>>>,
    next_dof: usize,
    global_dimension: usize,
    geometric_dimension: usize,
}

impl EntityDofDescriptor {
    /// `dofs_per_entity` is padded with zeros (or truncated) to the cell's
    /// dimension plus one.
    pub fn new(
        family: impl Into<String>,
        cell_type: CellType,
        mut dofs_per_entity: Vec<usize>,
        numbering: Numbering,
    ) -> Self {
        dofs_per_entity.resize(cell_type.dimension() + 1, 0);
        Self {
            family: family.into(),
            cell_type,
            dofs_per_entity,
            numbering,
            initialized: false,
            num_entities: Vec::new(),
            first_dof: Vec::new(),
            next_dof: 0,
            global_dimension: 0,
            geometric_dimension: cell_type.dimension(),
        }
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn dofs_per_entity(&self) -> &[usize] {
        &self.dofs_per_entity
    }

    pub fn numbering(&self) -> Numbering {
        self.numbering
    }

    /// Local position of the first dof on local entity `entity` of dimension `dim`.
    fn local_position(&self, dim: usize, entity: usize) -> usize {
        let before: usize = (0..dim)
            .map(|d| self.dofs_per_entity[d] * self.cell_type.num_entities(d))
            .sum();
        before + entity * self.dofs_per_entity[dim]
    }

    fn first_global_dof(&self, dim: usize, entity: usize, block_offset: usize) -> Option<usize> {
        match self.numbering {
            Numbering::Entity => Some(block_offset + entity * self.dofs_per_entity[dim]),
            Numbering::FirstTouch => self
                .first_dof
                .get(dim)
                .and_then(|row| row.get(entity))
                .copied()
                .flatten(),
        }
    }
}

impl ElementDofDescriptor for EntityDofDescriptor {
    fn signature(&self) -> String {
        format!(
            "EntityDofDescriptor('{}', {:?}, dofs_per_entity={:?}, numbering={:?})",
            self.family, self.cell_type, self.dofs_per_entity, self.numbering
        )
    }

    fn needs_mesh_entities(&self, dim: usize) -> bool {
        self.dofs_per_entity.get(dim).is_some_and(|&n| n > 0)
    }

    fn init_mesh(&mut self, mesh: &MeshSummary) -> bool {
        let tdim = self.cell_type.dimension();
        self.num_entities = (0..=tdim).map(|d| mesh.num_entities(d)).collect();
        self.geometric_dimension = mesh.geometric_dimension();
        self.initialized = true;
        match self.numbering {
            Numbering::Entity => {
                self.global_dimension = self
                    .num_entities
                    .iter()
                    .zip(&self.dofs_per_entity)
                    .map(|(count, n)| count * n)
                    .sum();
                false
            }
            Numbering::FirstTouch => {
                self.first_dof = self
                    .num_entities
                    .iter()
                    .zip(&self.dofs_per_entity)
                    .map(|(&count, &n)| if n > 0 { vec![None; count] } else { Vec::new() })
                    .collect();
                self.next_dof = 0;
                self.global_dimension = 0;
                true
            }
        }
    }

    fn init_cell(&mut self, _mesh: &MeshSummary, cell: &CellView) {
        for (dim, &n) in self.dofs_per_entity.iter().enumerate() {
            if n == 0 {
                continue;
            }
            for &entity in cell.entity_indices(dim) {
                if let Some(slot) = self.first_dof[dim].get_mut(entity) {
                    if slot.is_none() {
                        *slot = Some(self.next_dof);
                        self.next_dof += n;
                    }
                }
            }
        }
    }

    fn init_cell_finalize(&mut self) {
        self.global_dimension = self.next_dof;
    }

    fn global_dimension(&self) -> usize {
        self.global_dimension
    }

    fn max_local_dimension(&self) -> usize {
        self.dofs_per_entity
            .iter()
            .enumerate()
            .map(|(d, n)| n * self.cell_type.num_entities(d))
            .sum()
    }

    fn geometric_dimension(&self) -> usize {
        self.geometric_dimension
    }

    fn topological_dimension(&self) -> Option<usize> {
        Some(self.cell_type.dimension())
    }

    fn num_facet_dofs(&self) -> usize {
        let tdim = self.cell_type.dimension();
        (0..tdim)
            .map(|d| self.dofs_per_entity[d] * self.cell_type.facet_closure(0, d).len())
            .sum()
    }

    fn num_sub_dof_maps(&self) -> usize {
        0
    }

    fn create_sub_dof_map(&self, _index: usize) -> Option<Box<dyn ElementDofDescriptor>> {
        None
    }

    fn tabulate_dofs(&self, cell: &CellView) -> Vec<usize> {
        if !self.initialized {
            return Vec::new();
        }
        let mut dofs = Vec::with_capacity(self.max_local_dimension());
        let mut block_offset = 0;
        for (dim, &n) in self.dofs_per_entity.iter().enumerate() {
            if n == 0 {
                continue;
            }
            for &entity in cell.entity_indices(dim) {
                if let Some(first) = self.first_global_dof(dim, entity, block_offset) {
                    dofs.extend(first..first + n);
                }
            }
            block_offset += self.num_entities[dim] * n;
        }
        dofs
    }

    fn tabulate_coordinates(&self, cell: &CellView) -> Vec<Vec<f64>> {
        let mut points = Vec::with_capacity(self.max_local_dimension());
        for (dim, &n) in self.dofs_per_entity.iter().enumerate() {
            if n == 0 {
                continue;
            }
            let weights = entity_point_weights(dim, n);
            for verts in self.cell_type.local_entities(dim) {
                for w in &weights {
                    let mut x = vec![0.0; cell.geometric_dimension()];
                    for (&v, &wv) in verts.iter().zip(w) {
                        for (xi, &ci) in x.iter_mut().zip(cell.vertex_coordinates(v)) {
                            *xi += wv * ci;
                        }
                    }
                    points.push(x);
                }
            }
        }
        points
    }

    fn tabulate_facet_dofs(&self, local_facet: usize) -> Vec<usize> {
        let tdim = self.cell_type.dimension();
        let mut dofs = Vec::with_capacity(self.num_facet_dofs());
        for dim in 0..tdim {
            let n = self.dofs_per_entity[dim];
            if n == 0 {
                continue;
            }
            for entity in self.cell_type.facet_closure(local_facet, dim) {
                let first = self.local_position(dim, entity);
                dofs.extend(first..first + n);
            }
        }
        dofs
    }
}

/// Barycentric weights of the `n` dof points on an entity of dimension `dim`.
///
/// When `n` is the interior point count `C(k - 1, dim)` of some degree `k`
/// these are the interior points of the equispaced degree-`k` lattice.
/// Otherwise every dof sits at the entity's barycenter.
fn entity_point_weights(dim: usize, n: usize) -> Vec<Vec<f64>> {
    let barycenter = vec![1.0 / (dim + 1) as f64; dim + 1];
    if dim == 0 || n == 1 {
        return vec![barycenter; n];
    }
    let mut degree = dim + 1;
    while binomial(degree - 1, dim) < n {
        degree += 1;
    }
    if binomial(degree - 1, dim) != n {
        return vec![barycenter; n];
    }
    let mut weights = Vec::with_capacity(n);
    positive_compositions(degree, dim + 1, &mut Vec::new(), &mut |parts| {
        weights.push(parts.iter().map(|&a| a as f64 / degree as f64).collect());
    });
    weights
}

/// Visit every way of writing `total` as `parts` positive integers, in
/// lexicographic order.
fn positive_compositions(
    total: usize,
    parts: usize,
    prefix: &mut Vec<usize>,
    visit: &mut dyn FnMut(&[usize]),
) {
    if parts == 1 {
        prefix.push(total);
        visit(prefix);
        prefix.pop();
        return;
    }
    for first in 1..=total.saturating_sub(parts - 1) {
        prefix.push(first);
        positive_compositions(total - first, parts - 1, prefix, visit);
        prefix.pop();
    }
}
