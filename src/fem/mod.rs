//! Degree-of-freedom maps and the element descriptors behind them.

pub mod config;
pub mod descriptor;
pub mod dofmap;
pub mod element;
pub mod extract;
pub mod mixed;

pub use config::ElementSpec;
pub use descriptor::{ElementDofDescriptor, SharedDescriptor, share};
pub use dofmap::{CollapseMap, DofMap};
pub use element::{EntityDofDescriptor, Numbering};
pub use extract::{extract_sub_descriptor, sub_dofmap_offset};
pub use mixed::MixedDescriptor;
