//! Integration tests for volume allocation, release and misuse.

mod common;

use rstest::rstest;

use common::{Shape, allocated_engine, init_logging};
use umbra_core::math::Vec3;
use umbra_shadow::{ShadowVolumeError, ShadowVolumeFlags};

const LIGHT: Vec3 = Vec3::new(0.0, 5.0, 0.0);

#[test]
fn test_allocate_and_release() {
    let mut engine = Shape::Box.engine();
    assert_eq!(engine.volume_count(), 0);

    engine.allocate(7).unwrap();
    engine.allocate(9).unwrap();
    assert_eq!(engine.volume_count(), 2);
    assert!(engine.contains(7));
    assert!(engine.is_index_data_internal(7));

    engine.release(7).unwrap();
    assert!(!engine.contains(7));
    assert!(!engine.is_index_data_internal(7));
    assert_eq!(engine.volume_count(), 1);
}

#[rstest]
#[case::internal(false)]
#[case::external(true)]
fn test_double_allocate_is_rejected(#[case] external: bool) {
    init_logging();
    let mut engine = allocated_engine(Shape::Tetrahedron, 1);
    let result = if external {
        engine.allocate_external(1)
    } else {
        engine.allocate(1)
    };
    assert_eq!(result, Err(ShadowVolumeError::AlreadyExists(1)));
    // The original entry survives untouched.
    assert!(engine.is_index_data_internal(1));
    assert_eq!(engine.volume_count(), 1);
}

#[test]
fn test_release_unknown_volume() {
    let mut engine = allocated_engine(Shape::Tetrahedron, 1);
    assert_eq!(engine.release(2), Err(ShadowVolumeError::NotFound(2)));

    engine.release(1).unwrap();
    assert_eq!(engine.release(1), Err(ShadowVolumeError::NotFound(1)));
}

#[test]
fn test_unknown_volume_accessors() {
    let engine = allocated_engine(Shape::Tetrahedron, 1);
    assert_eq!(engine.num_indices(4), Err(ShadowVolumeError::NotFound(4)));
    assert_eq!(engine.indices(4), Err(ShadowVolumeError::NotFound(4)));
    assert_eq!(engine.index_bytes(4), Err(ShadowVolumeError::NotFound(4)));
    assert!(!engine.is_index_data_internal(4));
}

/// Projection fails for an absent ID and succeeds for a present one.
#[test]
fn test_project_requires_allocation() {
    let mut engine = Shape::Box.engine();
    assert_eq!(
        engine.project_silhouette(3, ShadowVolumeFlags::CAPS, &LIGHT, true, None),
        Err(ShadowVolumeError::NotFound(3))
    );

    engine.allocate(3).unwrap();
    assert!(
        engine
            .project_silhouette(3, ShadowVolumeFlags::CAPS, &LIGHT, true, None)
            .unwrap()
            > 0
    );

    engine.release(3).unwrap();
    assert_eq!(
        engine.project_silhouette(3, ShadowVolumeFlags::CAPS, &LIGHT, true, None),
        Err(ShadowVolumeError::NotFound(3))
    );
}

/// Re-allocating a released ID starts from a clean entry.
#[test]
fn test_reallocate_after_release() {
    let mut engine = allocated_engine(Shape::Box, 0);
    engine
        .project_silhouette(0, ShadowVolumeFlags::CAPS, &LIGHT, true, None)
        .unwrap();
    engine.release(0).unwrap();

    engine.allocate(0).unwrap();
    assert_eq!(engine.num_indices(0).unwrap(), 0);
    assert!(engine.indices(0).unwrap().is_empty());
}

#[test]
fn test_short_external_buffer_is_rejected_without_writes() {
    let mut engine = allocated_engine(Shape::Box, 0);
    engine
        .project_silhouette(0, ShadowVolumeFlags::empty(), &LIGHT, true, None)
        .unwrap();
    let before = engine.num_indices(0).unwrap();

    let required = engine.required_buffer_size();
    let mut buffer = vec![0u8; required - 1];
    assert_eq!(
        engine.project_silhouette(0, ShadowVolumeFlags::CAPS, &LIGHT, true, Some(&mut buffer[..])),
        Err(ShadowVolumeError::BufferTooSmall {
            required,
            provided: required - 1
        })
    );
    assert!(buffer.iter().all(|&b| b == 0));
    assert_eq!(engine.num_indices(0).unwrap(), before);
    assert_eq!(engine.indices(0).unwrap().len(), before as usize);
}

#[test]
fn test_external_only_volume_without_buffer() {
    let mut engine = Shape::Box.engine();
    engine.allocate_external(2).unwrap();
    assert_eq!(
        engine.project_silhouette(2, ShadowVolumeFlags::CAPS, &LIGHT, true, None),
        Err(ShadowVolumeError::NoInternalIndices(2))
    );
    assert_eq!(
        engine.indices(2),
        Err(ShadowVolumeError::NoInternalIndices(2))
    );
    assert_eq!(engine.num_indices(2).unwrap(), 0);
}

#[test]
fn test_worst_case_capacity() {
    for shape in [Shape::Tetrahedron, Shape::Box, Shape::Sphere] {
        let engine = shape.engine();
        let mesh = engine.mesh();
        assert_eq!(
            engine.max_indices(),
            mesh.triangle_count() * 6 + mesh.edge_count() * 6
        );
        assert_eq!(
            engine.required_buffer_size(),
            engine.max_indices() * engine.index_format().size()
        );
    }
}
