#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-dofmap
//!
//! mesh-dofmap maps the local degrees of freedom of a finite element on each
//! mesh cell to global indices. It binds an element dof descriptor to a
//! simplicial mesh, tabulates per-cell dofs, extracts the dof map of a
//! sub-space of a mixed element with the right index offset, and collapses a
//! sub-space map onto an independent contiguous numbering.
//!
//! ## Features
//! - [`DofMap`] with per-cell and per-facet tabulation
//! - Sub-space extraction along component paths (`[1, 0]` is sub-space 0 of
//!   sub-space 1) with accumulated offsets
//! - Collapse to a zero-based numbering plus the translation table back
//! - Built-in Lagrange, discontinuous and mixed descriptors configured from
//!   serde data ([`ElementSpec`])
//! - [`SimplexMesh`], an in-memory mesh with on-demand entity materialization
//!   and optional global numbering for distributed runs
//! - Block vectors and matrices sized from dof maps
//!
//! ## Usage
//! ```
//! use mesh_dofmap::prelude::*;
//!
//! let mut mesh = SimplexMesh::unit_square(2, 2)?;
//! let p2 = ElementSpec::lagrange(CellType::Triangle, 2);
//! let p1 = ElementSpec::lagrange(CellType::Triangle, 1);
//! let taylor_hood = ElementSpec::mixed(vec![ElementSpec::vector(p2, 2), p1]);
//!
//! let dofmap = DofMap::new(taylor_hood.shared(), &mut mesh)?;
//! let pressure = dofmap.extract_sub_dofmap(&[1], &mesh)?;
//! assert_eq!(pressure.offset(), 2 * 25);
//!
//! let (collapsed, to_parent) = pressure.collapse(&mesh)?;
//! assert_eq!(collapsed.global_dimension(), 9);
//! assert_eq!(to_parent[&0], 50);
//! # Ok::<(), mesh_dofmap::DofMapError>(())
//! ```
//!
//! ## Invariant checks
//! Structural checks run in debug builds. Enable the `check-invariants`
//! feature to keep them in release builds.

pub mod debug_invariants;
pub mod dofmap_error;
pub mod fem;
pub mod la;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use dofmap_error::DofMapError;
pub use fem::{DofMap, ElementDofDescriptor, ElementSpec};
pub use topology::{CellType, CellView, MeshTopology, SimplexMesh};

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::dofmap_error::DofMapError;
    pub use crate::fem::{
        CollapseMap, DofMap, ElementDofDescriptor, ElementSpec, EntityDofDescriptor,
        MixedDescriptor, Numbering, SharedDescriptor, share,
    };
    pub use crate::la::{BlockMatrix, BlockVector};
    pub use crate::topology::{CellType, CellView, MeshSummary, MeshTopology, SimplexMesh};
}
