// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loading models and pivot files from disk

use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;
use rodclash_core::decode;
use rodclash_geometry::{Mesh, Vector3};

use crate::error::Result;
use crate::pivot_config::parse_pivots;
use crate::pivots::Pivots;

/// Decode STL bytes and build the mesh
pub fn mesh_from_bytes(bytes: &[u8]) -> Result<Mesh> {
    let model = decode(bytes)?;
    if model.stats.zeroed_normals > 0 || model.stats.dropped_vertices > 0 {
        tracing::warn!(
            zeroed_normals = model.stats.zeroed_normals,
            dropped_vertices = model.stats.dropped_vertices,
            "model decoded with recovered anomalies"
        );
    }

    let mesh = Mesh::from_model(&model)?;
    tracing::info!(
        format = %model.format,
        facets = model.facet_count(),
        vertices = mesh.vertex_count(),
        edges = mesh.edge_count(),
        diameter = model.stats.diameter,
        "loaded model"
    );
    Ok(mesh)
}

/// Memory-map an STL file and build the mesh
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        // Zero-length files cannot be mapped on every platform
        return mesh_from_bytes(&[]);
    }

    // SAFETY: the map is read-only and lives only for this call; the file
    // must not be truncated by another process while it is decoded.
    let map = unsafe { Mmap::map(&file)? };
    tracing::debug!(path = %path.display(), bytes = map.len(), "mapped model file");
    mesh_from_bytes(&map)
}

/// Read and parse a pivot configuration file
pub fn load_pivots(path: impl AsRef<Path>) -> Result<Pivots> {
    let text = fs::read_to_string(path)?;
    Ok(parse_pivots(&text)?)
}

/// Copy of `mesh` moved vertically so its lowest point is at z = 0
pub fn grounded(mesh: &Mesh) -> Mesh {
    let (min, _) = mesh.bounds();
    if min.z == 0.0 {
        return mesh.clone();
    }
    tracing::debug!(shift = -min.z, "moving model onto the bed");
    mesh.translated(&Vector3::new(0.0, 0.0, -min.z))
}
