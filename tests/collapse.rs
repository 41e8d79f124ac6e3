use std::collections::BTreeSet;
use std::sync::Arc;

use mesh_dofmap::fem::{ElementSpec, Numbering};
use mesh_dofmap::topology::{CellType, MeshTopology, SimplexMesh};
use mesh_dofmap::DofMap;

mod util;
use util::*;

fn assert_round_trip<M: MeshTopology>(original: &DofMap, mesh: &M) {
    let (collapsed, translation) = original.collapse(mesh).unwrap();
    assert_eq!(collapsed.offset(), 0);
    for cell in 0..mesh.num_cells() {
        let from = original.tabulate_dofs(mesh, cell).unwrap();
        let to = collapsed.tabulate_dofs(mesh, cell).unwrap();
        for (k, dof) in to.iter().enumerate() {
            assert_eq!(translation[dof], from[k], "cell {cell}, local dof {k}");
        }
    }
}

#[test]
fn collapsing_offset_four_yields_four_to_seven() {
    let (mesh, map) = vector_p1_interval(3);
    let second = map.extract_sub_dofmap(&[1], &mesh).unwrap();
    let (collapsed, translation) = second.collapse(&mesh).unwrap();
    assert_eq!(collapsed.global_dimension(), 4);
    let values: BTreeSet<usize> = translation.values().copied().collect();
    assert_eq!(values, BTreeSet::from([4, 5, 6, 7]));
    let keys: BTreeSet<usize> = translation.keys().copied().collect();
    assert_eq!(keys, BTreeSet::from([0, 1, 2, 3]));
}

#[test]
fn collapse_round_trips_every_cell() {
    let (mesh, map) = taylor_hood(2, 3);
    assert_round_trip(&map, &mesh);
    let paths: [&[usize]; 4] = [&[0], &[1], &[0, 0], &[0, 1]];
    for path in paths {
        assert_round_trip(&map.extract_sub_dofmap(path, &mesh).unwrap(), &mesh);
    }
}

#[test]
fn collapse_round_trips_first_touch_numbering() {
    let mut mesh = SimplexMesh::unit_square(3, 2).unwrap();
    let p2 = ElementSpec::lagrange(CellType::Triangle, 2);
    let spec = ElementSpec::vector(p2, 2).with_numbering(Numbering::FirstTouch);
    let map = DofMap::new(spec.shared(), &mut mesh).unwrap();
    assert_round_trip(&map.extract_sub_dofmap(&[1], &mesh).unwrap(), &mesh);
}

#[test]
fn collapsed_map_reuses_descriptor() {
    let (mesh, map) = vector_p1_interval(2);
    let sub = map.extract_sub_dofmap(&[0], &mesh).unwrap();
    let (collapsed, _) = sub.collapse(&mesh).unwrap();
    assert!(Arc::ptr_eq(sub.descriptor(), collapsed.descriptor()));
    assert_eq!(collapsed.global_dimension(), sub.global_dimension());
}

#[test]
fn collapsed_pressure_space_is_contiguous() {
    let (mesh, map) = taylor_hood(2, 2);
    let pressure = map.extract_sub_dofmap(&[1], &mesh).unwrap();
    let (collapsed, translation) = pressure.collapse(&mesh).unwrap();
    let dofs = collapsed.dofs(&mesh, true).unwrap();
    assert_eq!(dofs, (0..9).collect::<Vec<_>>());
    assert_permutation(
        &translation.values().copied().collect::<Vec<_>>(),
        &(50..59).collect::<Vec<_>>(),
    );
}
