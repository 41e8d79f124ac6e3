use approx::assert_relative_eq;
use mesh_dofmap::la::{BlockMatrix, BlockVector};
use mesh_dofmap::topology::CellView;
use mesh_dofmap::DofMapError;
use nalgebra::DMatrix;

mod util;
use util::*;

#[test]
fn blocks_sized_from_collapsed_sub_spaces() {
    let (mesh, map) = taylor_hood(2, 2);
    let (velocity, _) = map.extract_sub_dofmap(&[0], &mesh).unwrap().collapse(&mesh).unwrap();
    let (pressure, _) = map.extract_sub_dofmap(&[1], &mesh).unwrap().collapse(&mesh).unwrap();

    let b = BlockVector::from_dofmaps(&[&velocity, &pressure]);
    assert_eq!(b.num_blocks(), 2);
    assert_eq!(b.size(), map.global_dimension());

    let a = BlockMatrix::from_dofmaps(&[&velocity, &pressure], &[&velocity, &pressure]);
    assert_eq!(a.size(0), Ok(2));
    assert_eq!(a.size(1), Ok(2));
    assert_eq!(a.block(0, 1).unwrap().shape(), (50, 9));
    assert!(matches!(a.size(2), Err(DofMapError::UnsupportedOperation(_))));
}

#[test]
fn assembling_a_lumped_mass_counts_cell_incidence() {
    let (mesh, map) = vector_p1_interval(4);
    let (p, _) = map.extract_sub_dofmap(&[0], &mesh).unwrap().collapse(&mesh).unwrap();
    let mut a = BlockMatrix::from_dofmaps(&[&p], &[&p]);
    let mut b = BlockVector::from_dofmaps(&[&p]);
    let ke = DMatrix::identity(2, 2);

    let mut view = CellView::new(&mesh);
    for cell in 0..4 {
        view.update(&mesh, cell).unwrap();
        let dofs = p.tabulate_cell_dofs(&view);
        a.add_local(0, 0, &dofs, &dofs, &ke).unwrap();
        b.add_local(0, &dofs, &[1.0, 1.0]).unwrap();
    }

    let mut y = BlockVector::new(&[0]);
    a.mult(&b, &mut y, false).unwrap();
    // interior vertices belong to two cells: 2 * 2
    let y0 = y.block(0).unwrap();
    assert_relative_eq!(y0[0], 1.0);
    assert_relative_eq!(y0[2], 4.0);
    assert_relative_eq!(y0[4], 1.0);

    assert!(a.mult(&b, &mut y, true).is_err());
    a.zero();
    b.zero();
    assert_eq!(b.block(0).unwrap().sum(), 0.0);
}
