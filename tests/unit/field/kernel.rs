use super::*;
use crate::scene::params::{FieldCenter, Shape};
use std::f64::consts::TAU;

fn field(strength: f64, cx: f64, cy: f64, shape: Shape) -> FieldParams {
    FieldParams {
        strength,
        center: FieldCenter::new(cx, cy),
        shape,
        ..FieldParams::default()
    }
}

#[test]
fn displacement_is_bit_identical_across_calls() {
    let lattice = Lattice::new(23).unwrap();
    let f = field(0.37, 0.1, -0.4, Shape::Cube);
    for t in [0.0, 1.3, 7.77, 9.999] {
        let time = AnimationTime::at(t);
        for &p in lattice.points() {
            let a = displace(p, time, &f);
            let b = displace(p, time, &f);
            assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
            assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
            assert_eq!(a.position.z.to_bits(), b.position.z.to_bits());
            assert_eq!(a.orientation, b.orientation);
        }
    }
}

#[test]
fn zero_strength_leaves_lattice_untouched() {
    let lattice = Lattice::new(2).unwrap();
    for (cx, cy) in [(0.0, 0.0), (0.9, -0.3), (-1.0, 1.0)] {
        for t in [0.0, 2.5, 9.0] {
            let f = field(0.0, cx, cy, Shape::Point);
            for &p in lattice.points() {
                let d = displace(p, AnimationTime::at(t), &f);
                assert_eq!(d.position.x, p.x0);
                assert_eq!(d.position.y, p.y0);
                assert_eq!(d.position.z, 0.0);
            }
        }
    }
}

#[test]
fn point_at_field_center_does_not_move_in_plane() {
    let p = LatticePoint { x0: 0.3, y0: -0.2 };
    for strength in [0.0, 0.1, 0.5] {
        for t in [0.0, 1.0, 4.2, 9.9] {
            let d = displace(p, AnimationTime::at(t), &field(strength, 0.3, -0.2, Shape::Sphere));
            assert!((d.position.x - 0.3).abs() < 1e-12);
            assert!((d.position.y + 0.2).abs() < 1e-12);
            let expected_z = (-AnimationTime::at(t).phase()).sin() * strength * 0.5;
            assert!((d.position.z - expected_z).abs() < 1e-12);
        }
    }
}

#[test]
fn corner_point_follows_radial_sine_sign() {
    let lattice = Lattice::new(100).unwrap();
    let corner = lattice.get(99, 99).unwrap();
    let f = field(0.2, 0.0, 0.0, Shape::Point);
    let d = displace(corner, AnimationTime::at(0.0), &f);

    let distance = (corner.x0 * corner.x0 + corner.y0 * corner.y0).sqrt();
    let expected_radial = (distance * 10.0).sin() * 0.2 * 0.5;
    let new_distance = (d.position.x * d.position.x + d.position.y * d.position.y).sqrt();

    // sin(10.6) < 0: the corner is pulled towards the center.
    assert!(expected_radial < 0.0);
    assert!((new_distance - (distance + expected_radial)).abs() < 1e-12);
    assert!(new_distance < distance);

    let expected_z = (distance * 5.0).sin() * 0.2 * 0.5;
    assert!((d.position.z - expected_z).abs() < 1e-12);
}

#[test]
fn orientation_only_for_instanced_shapes() {
    let p = LatticePoint { x0: 0.5, y0: 0.5 };
    let time = AnimationTime::at(2.5);
    assert_eq!(
        displace(p, time, &field(0.1, 0.0, 0.0, Shape::Point)).orientation,
        None
    );

    let o = displace(p, time, &field(0.1, 0.0, 0.0, Shape::Tetrahedron))
        .orientation
        .unwrap();
    assert!((o.rot_x - TAU / 4.0).abs() < 1e-12);
    assert!((o.rot_y - TAU / 8.0).abs() < 1e-12);
}

#[test]
fn motion_repeats_every_cycle() {
    let p = LatticePoint { x0: -0.4, y0: 0.6 };
    let f = field(0.3, 0.2, 0.1, Shape::Point);
    let a = displace(p, AnimationTime::at(3.0), &f);
    let b = displace(p, AnimationTime::at(3.0 + crate::foundation::core::CYCLE_DURATION), &f);
    assert_eq!(a, b);
}

#[test]
fn parallel_and_sequential_outputs_match() {
    let lattice = Lattice::new(64).unwrap();
    let f = field(0.25, -0.3, 0.45, Shape::Cube);
    let time = AnimationTime::at(6.1);

    let mut seq = Vec::new();
    let mut par = Vec::new();
    displace_lattice(&lattice, time, &f, false, &mut seq);
    displace_lattice(&lattice, time, &f, true, &mut par);

    assert_eq!(seq.len(), lattice.len());
    assert_eq!(seq, par);
    assert_eq!(seq[5], displace(lattice.points()[5], time, &f));
}
