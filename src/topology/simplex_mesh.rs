//! In-memory simplicial mesh implementing [`MeshTopology`].
//!
//! Cells are stored as vertex lists. Intermediate entities (edges, faces) are
//! materialized on demand by [`SimplexMesh::init`]: cells are visited in
//! ascending order, their local entities in reference order, and each entity
//! receives the next free index the first time it is seen.
//!
//! A mesh becomes *distributed* once a global numbering has been attached to
//! any dimension via [`SimplexMesh::set_global_numbering`]; computing such a
//! numbering across processes is the partitioner's job, not this type's.

use hashbrown::HashMap;

use crate::debug_invariants::DebugInvariants;
use crate::dofmap_error::DofMapError;
use crate::topology::cell_type::CellType;
use crate::topology::mesh::MeshTopology;

/// Global numbering of one entity dimension on this process.
#[derive(Clone, Debug, PartialEq, Eq)]
struct GlobalNumbering {
    indices: Vec<usize>,
    num_global: usize,
    offset: usize,
}

/// Simplicial mesh with on-demand entity materialization.
#[derive(Clone, Debug)]
pub struct SimplexMesh {
    cell_type: CellType,
    gdim: usize,
    coordinates: Vec<f64>,
    /// `connectivity[d][cell]` lists the entities of dimension `d` of `cell`;
    /// `None` until dimension `d` is materialized.
    connectivity: Vec<Option<Vec<Vec<usize>>>>,
    entity_counts: Vec<usize>,
    global: Vec<Option<GlobalNumbering>>,
}

impl SimplexMesh {
    /// Build a mesh from flat vertex coordinates (`gdim` values per vertex)
    /// and per-cell vertex lists.
    pub fn new(
        cell_type: CellType,
        gdim: usize,
        coordinates: Vec<f64>,
        cells: Vec<Vec<usize>>,
    ) -> Result<Self, DofMapError> {
        if gdim == 0 || coordinates.len() % gdim != 0 {
            return Err(DofMapError::InvalidMesh(format!(
                "{} coordinate values cannot be split into points of dimension {gdim}",
                coordinates.len()
            )));
        }
        let num_vertices = coordinates.len() / gdim;
        let nv = cell_type.num_vertices();
        for (c, cell) in cells.iter().enumerate() {
            if cell.len() != nv {
                return Err(DofMapError::InvalidMesh(format!(
                    "cell {c} has {} vertices, expected {nv} for {cell_type:?}",
                    cell.len()
                )));
            }
            if let Some(&v) = cell.iter().find(|&&v| v >= num_vertices) {
                return Err(DofMapError::InvalidMesh(format!(
                    "cell {c} references vertex {v} but mesh has {num_vertices} vertices"
                )));
            }
        }

        let tdim = cell_type.dimension();
        let num_cells = cells.len();
        let mut connectivity = vec![None; tdim + 1];
        let mut entity_counts = vec![0; tdim + 1];
        if tdim > 0 {
            connectivity[tdim] = Some((0..num_cells).map(|c| vec![c]).collect());
            entity_counts[tdim] = num_cells;
        }
        connectivity[0] = Some(cells);
        entity_counts[0] = if tdim == 0 { num_cells } else { num_vertices };

        let mesh = Self {
            cell_type,
            gdim,
            coordinates,
            connectivity,
            entity_counts,
            global: vec![None; tdim + 1],
        };
        mesh.debug_assert_invariants();
        Ok(mesh)
    }

    /// Uniform mesh of the unit interval with `n` cells.
    pub fn unit_interval(n: usize) -> Result<Self, DofMapError> {
        let coordinates = (0..=n).map(|i| i as f64 / n.max(1) as f64).collect();
        let cells = (0..n).map(|i| vec![i, i + 1]).collect();
        Self::new(CellType::Interval, 1, coordinates, cells)
    }

    /// Unit square split into `nx * ny` squares, each cut into two triangles
    /// along its diagonal.
    pub fn unit_square(nx: usize, ny: usize) -> Result<Self, DofMapError> {
        let mut coordinates = Vec::with_capacity((nx + 1) * (ny + 1) * 2);
        for j in 0..=ny {
            for i in 0..=nx {
                coordinates.push(i as f64 / nx.max(1) as f64);
                coordinates.push(j as f64 / ny.max(1) as f64);
            }
        }
        let mut cells = Vec::with_capacity(2 * nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let v0 = j * (nx + 1) + i;
                let v1 = v0 + 1;
                let v2 = v0 + nx + 1;
                let v3 = v2 + 1;
                cells.push(vec![v0, v1, v3]);
                cells.push(vec![v0, v2, v3]);
            }
        }
        Self::new(CellType::Triangle, 2, coordinates, cells)
    }

    /// Number of vertices (entities of dimension 0).
    pub fn num_vertices(&self) -> usize {
        self.coordinates.len() / self.gdim
    }

    /// Whether entities of dimension `dim` have been materialized.
    pub fn is_initialized(&self, dim: usize) -> bool {
        self.connectivity.get(dim).is_some_and(|c| c.is_some())
    }

    /// Reorder every cell's vertices ascending by (global) vertex index.
    ///
    /// Local entity order changes with the vertex order, so every derived
    /// dimension is dropped and must be materialized again.
    pub fn order(&mut self) {
        let tdim = self.cell_type.dimension();
        let global_vertices = self.global[0].as_ref().map(|g| g.indices.clone());
        if let Some(cells) = self.connectivity[0].as_mut() {
            for cell in cells.iter_mut() {
                match &global_vertices {
                    Some(global) => cell.sort_unstable_by_key(|&v| global[v]),
                    None => cell.sort_unstable(),
                }
            }
        }
        for d in 1..tdim {
            self.connectivity[d] = None;
            self.entity_counts[d] = 0;
            self.global[d] = None;
        }
    }

    /// Attach a global numbering to the materialized entities of dimension `dim`.
    ///
    /// `indices[e]` is the global index of local entity `e`, `num_global` the
    /// number of entities across all processes and `offset` the first global
    /// index owned by this process.
    pub fn set_global_numbering(
        &mut self,
        dim: usize,
        indices: Vec<usize>,
        num_global: usize,
        offset: usize,
    ) -> Result<(), DofMapError> {
        let local = self.num_entities(dim);
        if !self.is_initialized(dim) || indices.len() != local {
            return Err(DofMapError::InvalidMesh(format!(
                "global numbering for dimension {dim} has {} entries, mesh has {local} entities",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&g| g >= num_global) {
            return Err(DofMapError::InvalidMesh(format!(
                "global index {bad} exceeds global entity count {num_global} for dimension {dim}"
            )));
        }
        self.global[dim] = Some(GlobalNumbering {
            indices,
            num_global,
            offset,
        });
        Ok(())
    }

    fn build_entities(&self, dim: usize) -> (Vec<Vec<usize>>, usize) {
        let local = self.cell_type.local_entities(dim);
        let cells = self.connectivity[0].as_deref().unwrap_or_default();
        let mut index: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut cell_entities = Vec::with_capacity(cells.len());
        for cell in cells {
            let row = local
                .iter()
                .map(|verts| {
                    let mut key: Vec<usize> = verts.iter().map(|&v| cell[v]).collect();
                    key.sort_unstable();
                    let next = index.len();
                    *index.entry(key).or_insert(next)
                })
                .collect();
            cell_entities.push(row);
        }
        (cell_entities, index.len())
    }
}

impl MeshTopology for SimplexMesh {
    fn cell_type(&self) -> CellType {
        self.cell_type
    }

    fn geometric_dimension(&self) -> usize {
        self.gdim
    }

    fn num_entities(&self, dim: usize) -> usize {
        self.entity_counts.get(dim).copied().unwrap_or(0)
    }

    fn num_cells(&self) -> usize {
        self.connectivity[0].as_ref().map_or(0, Vec::len)
    }

    fn is_ordered(&self) -> bool {
        let global_vertices = self.global[0].as_ref().map(|g| &g.indices);
        self.connectivity[0].iter().flatten().all(|cell| {
            cell.windows(2).all(|w| match global_vertices {
                Some(global) => global[w[0]] < global[w[1]],
                None => w[0] < w[1],
            })
        })
    }

    fn init(&mut self, dim: usize) {
        if dim > self.cell_type.dimension() || self.is_initialized(dim) {
            return;
        }
        let (cell_entities, count) = self.build_entities(dim);
        log::trace!("materialized {count} entities of dimension {dim}");
        self.connectivity[dim] = Some(cell_entities);
        self.entity_counts[dim] = count;
    }

    fn cell_entities(&self, cell: usize, dim: usize) -> &[usize] {
        self.connectivity
            .get(dim)
            .and_then(|c| c.as_ref())
            .and_then(|rows| rows.get(cell))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn vertex_coordinates(&self, vertex: usize) -> &[f64] {
        let start = vertex * self.gdim;
        self.coordinates
            .get(start..start + self.gdim)
            .unwrap_or_default()
    }

    fn is_distributed(&self) -> bool {
        self.global.iter().any(Option::is_some)
    }

    fn number_entities(&mut self, dim: usize) -> Result<(), DofMapError> {
        if !self.is_distributed() || self.global.get(dim).is_some_and(Option::is_some) {
            return Ok(());
        }
        Err(DofMapError::InvalidMesh(format!(
            "distributed mesh has no global numbering for entities of dimension {dim}; \
             call `set_global_numbering({dim}, ..)` after `init({dim})`"
        )))
    }

    fn global_entity_index(&self, dim: usize, entity: usize) -> usize {
        match self.global.get(dim).and_then(|g| g.as_ref()) {
            Some(numbering) => numbering.indices[entity],
            None => entity,
        }
    }

    fn num_global_entities(&self, dim: usize) -> usize {
        match self.global.get(dim).and_then(|g| g.as_ref()) {
            Some(numbering) => numbering.num_global,
            None => self.num_entities(dim),
        }
    }

    fn global_entity_offset(&self, dim: usize) -> Option<usize> {
        self.global
            .get(dim)
            .and_then(|g| g.as_ref())
            .map(|numbering| numbering.offset)
    }
}

impl DebugInvariants for SimplexMesh {
    fn validate_invariants(&self) -> Result<(), DofMapError> {
        let num_vertices = self.num_vertices();
        let num_cells = self.num_cells();
        for (d, rows) in self.connectivity.iter().enumerate() {
            let Some(rows) = rows else { continue };
            if rows.len() != num_cells {
                return Err(DofMapError::InvalidMesh(format!(
                    "dimension {d} has {} connectivity rows for {num_cells} cells",
                    rows.len()
                )));
            }
            let width = if d == 0 {
                self.cell_type.num_vertices()
            } else {
                self.cell_type.num_entities(d)
            };
            let bound = if d == 0 { num_vertices } else { self.entity_counts[d] };
            for (c, row) in rows.iter().enumerate() {
                if row.len() != width || row.iter().any(|&e| e >= bound) {
                    return Err(DofMapError::InvalidMesh(format!(
                        "cell {c} has malformed connectivity {row:?} in dimension {d}"
                    )));
                }
            }
        }
        Ok(())
    }
}
