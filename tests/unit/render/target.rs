use super::*;
use crate::field::kernel::displace;
use crate::foundation::core::AnimationTime;
use crate::scene::params::{FieldCenter, FieldParams};

fn frame_for(lattice: &Lattice, shape: Shape, t: f64) -> Vec<DisplacedPoint> {
    let f = FieldParams {
        shape,
        strength: 0.3,
        center: FieldCenter::new(0.1, 0.2),
        ..FieldParams::default()
    };
    lattice
        .points()
        .iter()
        .map(|&p| displace(p, AnimationTime::at(t), &f))
        .collect()
}

#[test]
fn shape_selects_representation() {
    let l = Lattice::new(4).unwrap();
    assert!(matches!(
        Representation::for_shape(Shape::Point, &l, 0.01),
        Representation::Points(_)
    ));
    for shape in [Shape::Cube, Shape::Tetrahedron, Shape::Sphere] {
        let r = Representation::for_shape(shape, &l, 0.01);
        assert!(matches!(r, Representation::Instances(_)));
        assert!(r.matches_shape(shape));
        assert!(!r.matches_shape(Shape::Point));
        assert_eq!(r.len(), 16);
        assert_eq!(r.generation(), l.generation());
    }
}

#[test]
fn point_cloud_writes_positions_in_lattice_order() {
    let l = Lattice::new(5).unwrap();
    let mut r = Representation::for_shape(Shape::Point, &l, 0.02);
    let frame = frame_for(&l, Shape::Point, 3.0);
    r.write_frame(&frame).unwrap();
    assert_eq!(r.revision(), 1);

    let Representation::Points(cloud) = &r else {
        panic!("expected point cloud");
    };
    for (slot, p) in cloud.positions().iter().zip(&frame) {
        assert_eq!(*slot, p.position.to_f32_array());
    }
}

#[test]
fn instanced_mesh_composes_translate_scale_rotate() {
    let l = Lattice::new(3).unwrap();
    let mut r = Representation::for_shape(Shape::Cube, &l, 0.05);
    let frame = frame_for(&l, Shape::Cube, 2.5);
    r.write_frame(&frame).unwrap();

    let Representation::Instances(mesh) = &r else {
        panic!("expected instanced mesh");
    };
    assert_eq!(mesh.geometry(), InstanceGeometry::Square);
    let p = frame[4];
    let o = p.orientation.unwrap();
    let expected = Mat4::translation(p.position)
        * Mat4::scale(0.05)
        * Mat4::rotation_x(o.rot_x)
        * Mat4::rotation_y(o.rot_y);
    assert_eq!(mesh.transforms()[4], expected);
    assert_eq!(mesh.transforms()[4].translation_part(), p.position);
    assert_eq!(mesh.instance_buffer().len(), 9 * 16);
}

#[test]
fn mismatched_frame_is_rejected_without_writing() {
    let small = Lattice::new(3).unwrap();
    let big = Lattice::new(4).unwrap();
    let mut r = Representation::for_shape(Shape::Sphere, &small, 0.01);
    let before = r.clone();

    let err = r.write_frame(&frame_for(&big, Shape::Sphere, 1.0)).unwrap_err();
    assert!(err.to_string().contains("render error:"));
    assert_eq!(r.revision(), 0);

    let (Representation::Instances(a), Representation::Instances(b)) = (&r, &before) else {
        panic!("expected instanced mesh");
    };
    assert_eq!(a.transforms(), b.transforms());
}

#[test]
fn point_size_updates_without_rebuild() {
    let l = Lattice::new(2).unwrap();
    let mut r = Representation::for_shape(Shape::Tetrahedron, &l, 0.01);
    r.set_point_size(0.08);
    r.write_frame(&frame_for(&l, Shape::Tetrahedron, 0.0)).unwrap();
    let Representation::Instances(mesh) = &r else {
        panic!("expected instanced mesh");
    };
    assert_eq!(mesh.point_size(), 0.08);
    // At phase 0 the rotation is identity, so the diagonal is the scale.
    assert!((mesh.transforms()[0].0[0] - 0.08).abs() < 1e-12);
}

#[test]
fn outlines_have_expected_vertex_counts() {
    assert_eq!(InstanceGeometry::Square.outline().len(), 4);
    assert_eq!(InstanceGeometry::Triangle.outline().len(), 3);
    assert_eq!(InstanceGeometry::Circle.outline().len(), 32);
    assert_eq!(InstanceGeometry::for_shape(Shape::Point), None);
    for v in InstanceGeometry::Circle.outline() {
        assert!(((v.x * v.x + v.y * v.y).sqrt() - 0.5).abs() < 1e-12);
    }
}
