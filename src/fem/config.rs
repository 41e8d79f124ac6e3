//! Serializable element configuration.
//!
//! An [`ElementSpec`] is plain data describing one of the built-in
//! descriptors. It is what composite descriptors keep around so they can
//! hand out fresh sub-space descriptors, and it can be loaded from any serde
//! format:
//!
//! ```json
//! { "kind": "mixed", "elements": [
//!     { "kind": "entity", "family": "Lagrange", "cell": "triangle", "dofs_per_entity": [1, 1] },
//!     { "kind": "entity", "family": "Lagrange", "cell": "triangle", "dofs_per_entity": [1] } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::fem::descriptor::{ElementDofDescriptor, SharedDescriptor, share};
use crate::fem::element::{EntityDofDescriptor, Numbering};
use crate::fem::mixed::MixedDescriptor;
use crate::topology::cell_type::{CellType, binomial};

/// Description of a built-in element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementSpec {
    /// Fixed number of dofs per entity dimension.
    Entity {
        family: String,
        cell: CellType,
        dofs_per_entity: Vec<usize>,
        #[serde(default)]
        numbering: Numbering,
    },
    /// Concatenation of sub-elements.
    Mixed { elements: Vec<ElementSpec> },
}

impl ElementSpec {
    /// Continuous Lagrange element of `degree` on `cell`.
    ///
    /// Degree 0 gives the discontinuous piecewise-constant element. For
    /// `degree >= 1` a `d`-dimensional entity carries `C(degree - 1, d)` dofs.
    pub fn lagrange(cell: CellType, degree: usize) -> Self {
        if degree == 0 {
            return Self::discontinuous(cell);
        }
        let dofs_per_entity = (0..=cell.dimension())
            .map(|d| binomial(degree - 1, d))
            .collect();
        ElementSpec::Entity {
            family: "Lagrange".to_string(),
            cell,
            dofs_per_entity,
            numbering: Numbering::Entity,
        }
    }

    /// Piecewise constant element: one dof per cell.
    pub fn discontinuous(cell: CellType) -> Self {
        let mut dofs_per_entity = vec![0; cell.dimension() + 1];
        dofs_per_entity[cell.dimension()] = 1;
        ElementSpec::Entity {
            family: "Discontinuous Lagrange".to_string(),
            cell,
            dofs_per_entity,
            numbering: Numbering::Entity,
        }
    }

    /// `components` copies of `element`, as a mixed element.
    pub fn vector(element: ElementSpec, components: usize) -> Self {
        ElementSpec::Mixed {
            elements: vec![element; components],
        }
    }

    pub fn mixed(elements: Vec<ElementSpec>) -> Self {
        ElementSpec::Mixed { elements }
    }

    /// Same element with `numbering` applied to every entity element.
    pub fn with_numbering(self, numbering: Numbering) -> Self {
        match self {
            ElementSpec::Entity {
                family,
                cell,
                dofs_per_entity,
                ..
            } => ElementSpec::Entity {
                family,
                cell,
                dofs_per_entity,
                numbering,
            },
            ElementSpec::Mixed { elements } => ElementSpec::Mixed {
                elements: elements
                    .into_iter()
                    .map(|e| e.with_numbering(numbering))
                    .collect(),
            },
        }
    }

    /// Fresh, uninitialized descriptor for this element.
    pub fn instantiate(&self) -> Box<dyn ElementDofDescriptor> {
        match self {
            ElementSpec::Entity {
                family,
                cell,
                dofs_per_entity,
                numbering,
            } => Box::new(EntityDofDescriptor::new(
                family.clone(),
                *cell,
                dofs_per_entity.clone(),
                *numbering,
            )),
            ElementSpec::Mixed { elements } => Box::new(MixedDescriptor::new(elements.clone())),
        }
    }

    /// Fresh descriptor wrapped for sharing between dof maps.
    pub fn shared(&self) -> SharedDescriptor {
        share(self.instantiate())
    }
}
