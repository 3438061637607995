use super::*;

#[test]
fn point_count_is_grid_size_squared() {
    for g in [2, 3, 50, 101] {
        let l = Lattice::new(g).unwrap();
        assert_eq!(l.len(), (g * g) as usize);
        assert_eq!(l.grid_size(), g);
    }
}

#[test]
fn rejects_degenerate_grid() {
    assert!(Lattice::new(0).is_err());
    assert!(Lattice::new(1).is_err());
}

#[test]
fn spans_symmetric_square_row_major() {
    let l = Lattice::new(3).unwrap();
    let half = LATTICE_SPAN / 2.0;
    let p = l.points();
    assert_eq!(p[0], LatticePoint { x0: -half, y0: -half });
    assert_eq!(p[1], LatticePoint { x0: 0.0, y0: -half });
    assert_eq!(p[2], LatticePoint { x0: half, y0: -half });
    assert_eq!(p[3], LatticePoint { x0: -half, y0: 0.0 });
    assert_eq!(p[8], LatticePoint { x0: half, y0: half });
    assert_eq!(l.get(2, 1), Some(LatticePoint { x0: half, y0: 0.0 }));
    assert_eq!(l.get(3, 0), None);
}

#[test]
fn regeneration_is_deterministic_but_gets_new_generation() {
    let a = Lattice::new(17).unwrap();
    let b = Lattice::new(17).unwrap();
    assert_eq!(a.points(), b.points());
    assert_ne!(a.generation(), b.generation());
}
