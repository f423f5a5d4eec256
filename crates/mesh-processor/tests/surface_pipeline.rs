//! End-to-end pipeline: raw buffers → mesh → normals → volume probe →
//! interleaved geometry bundle.

use bytes::Bytes;
use mesh_processor::{build_surface, compute_normals, split_interleaved, Mesh};
use test_utils::{
    build_nrrd, coordinate_volume_payload, index_buffer, nrrd_header, unit_triangle,
    vertex_buffer,
};

#[tokio::test]
async fn test_full_pipeline_with_volume() {
    // An 8x8x8 volume whose voxels store their own coordinates.
    let nrrd = build_nrrd(&nrrd_header(3, 8, 8, 8), &coordinate_volume_payload(8, 8, 8));
    let volume = nrrd_parser::parse(Bytes::from(nrrd)).await.unwrap();

    // A triangle sitting well inside the volume.
    let positions = vec![[2.0, 2.0, 2.0], [4.0, 2.0, 2.0], [2.0, 4.0, 2.0]];
    let mesh = Mesh::new(positions, vec![0, 1, 2]).unwrap();
    let normals = compute_normals(&mesh);

    let bundle = build_surface(&mesh, &normals, Some(&volume), None).unwrap();

    let layout = bundle.buffer.layout();
    assert_eq!(layout.stride, 9);
    assert_eq!(layout.field("position").unwrap().offset, 0);
    assert_eq!(layout.field("normal").unwrap().offset, 3);
    assert_eq!(layout.field("aux").unwrap().offset, 6);
    assert_eq!(bundle.buffer.vertex_count(), 3);
    assert_eq!(bundle.indices, vec![0, 1, 2]);

    // Every probe lands inside the volume.
    assert_eq!(bundle.diagnostics.volume_hit_percent, Some(100.0));
    assert_eq!(bundle.diagnostics.invalid_normal_count, 0);

    // Aux coordinates come from the volume, which stores voxel
    // coordinates, so they track the (normal-shifted) vertex positions.
    let aux = *layout.field("aux").unwrap();
    let sample = bundle.buffer.field(0, &aux);
    assert!(sample.iter().all(|&c| c >= 0.0));
}

#[tokio::test]
async fn test_probe_outside_volume_keeps_sentinel() {
    let nrrd = build_nrrd(&nrrd_header(3, 2, 2, 2), &coordinate_volume_payload(2, 2, 2));
    let volume = nrrd_parser::parse(Bytes::from(nrrd)).await.unwrap();

    // Mesh entirely outside the 2x2x2 volume.
    let positions = vec![[50.0, 50.0, 50.0], [51.0, 50.0, 50.0], [50.0, 51.0, 50.0]];
    let mesh = Mesh::new(positions, vec![0, 1, 2]).unwrap();
    let normals = compute_normals(&mesh);

    let bundle = build_surface(&mesh, &normals, Some(&volume), None).unwrap();
    assert_eq!(bundle.diagnostics.volume_hit_percent, Some(0.0));

    let aux = *bundle.buffer.layout().field("aux").unwrap();
    for vertex in 0..3 {
        assert_eq!(bundle.buffer.field(vertex, &aux), &[-1.0, -1.0, -1.0]);
    }
}

#[test]
fn test_raw_buffer_ingestion_round_trip() {
    let (positions, indices) = unit_triangle();
    let mesh =
        Mesh::from_raw_buffers(&index_buffer(&indices), &vertex_buffer(&positions)).unwrap();
    assert_eq!(mesh.positions(), positions.as_slice());
    assert_eq!(mesh.indices(), indices.as_slice());
}

#[test]
fn test_preinterleaved_buffer_splits_and_repacks() {
    // Two vertices of 9 floats each, as an external loader would ship.
    let floats: Vec<f32> = (0..18).map(|i| i as f32 * 0.5).collect();
    let bytes: Vec<u8> = floats.iter().flat_map(|f| f.to_le_bytes()).collect();

    let split = split_interleaved(&bytes).unwrap();
    assert_eq!(split.positions.len(), 2);
    assert_eq!(split.positions[1], [4.5, 5.0, 5.5]);
    assert_eq!(split.normals[0], [1.5, 2.0, 2.5]);
    assert_eq!(split.aux[1], [7.5, 8.0, 8.5]);
}
