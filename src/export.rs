//! Mesh buffer export for downstream renderers and DCC tools.

use crate::mesh::MeshBuffers;

/// Serialize the mesh as Wavefront OBJ text.
pub fn to_obj(mesh: &MeshBuffers) -> String {
    let mut obj = String::new();

    obj.push_str("# terramesh heightfield\n\n");

    for vertex in &mesh.positions {
        obj.push_str(&format!("v {} {} {}\n", vertex.x, vertex.y, vertex.z));
    }

    obj.push('\n');

    for uv in &mesh.uvs {
        obj.push_str(&format!("vt {} {}\n", uv.u, uv.v));
    }

    obj.push('\n');

    for normal in &mesh.normals {
        obj.push_str(&format!("vn {} {} {}\n", normal.x, normal.y, normal.z));
    }

    obj.push('\n');

    // OBJ face indices are 1-based.
    for triangle in mesh.indices.chunks_exact(3) {
        let i0 = triangle[0] + 1;
        let i1 = triangle[1] + 1;
        let i2 = triangle[2] + 1;

        obj.push_str(&format!(
            "f {}/{}/{} {}/{}/{} {}/{}/{}\n",
            i0, i0, i0, i1, i1, i1, i2, i2, i2
        ));
    }

    obj
}

/// Serialize the mesh structure as a glTF 2.0 JSON scaffold.
///
/// Accessors and buffer views describe the binary layout a host engine
/// would upload; the buffer payload itself is not embedded.
pub fn to_gltf_json(mesh: &MeshBuffers, name: &str) -> String {
    let positions_len = mesh.positions.len() * 12;
    let normals_len = mesh.normals.len() * 12;
    let uvs_len = mesh.uvs.len() * 8;
    let indices_len = mesh.indices.len() * 4;

    serde_json::json!({
        "asset": {
            "version": "2.0",
            "generator": "terramesh"
        },
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{
            "mesh": 0,
            "name": name
        }],
        "meshes": [{
            "primitives": [{
                "attributes": {
                    "POSITION": 0,
                    "NORMAL": 1,
                    "TEXCOORD_0": 2
                },
                "indices": 3
            }]
        }],
        "accessors": [
            {
                "bufferView": 0,
                "componentType": 5126,
                "count": mesh.positions.len(),
                "type": "VEC3",
                "max": bounds_max(mesh),
                "min": bounds_min(mesh)
            },
            {
                "bufferView": 1,
                "componentType": 5126,
                "count": mesh.normals.len(),
                "type": "VEC3"
            },
            {
                "bufferView": 2,
                "componentType": 5126,
                "count": mesh.uvs.len(),
                "type": "VEC2"
            },
            {
                "bufferView": 3,
                "componentType": 5125,
                "count": mesh.indices.len(),
                "type": "SCALAR"
            }
        ],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": positions_len},
            {"buffer": 0, "byteOffset": positions_len, "byteLength": normals_len},
            {"buffer": 0, "byteOffset": positions_len + normals_len, "byteLength": uvs_len},
            {"buffer": 0, "byteOffset": positions_len + normals_len + uvs_len, "byteLength": indices_len}
        ],
        "buffers": [{
            "byteLength": positions_len + normals_len + uvs_len + indices_len
        }]
    })
    .to_string()
}

fn bounds_max(mesh: &MeshBuffers) -> Vec<f32> {
    let mut max = [f32::MIN; 3];
    for v in &mesh.positions {
        max[0] = max[0].max(v.x);
        max[1] = max[1].max(v.y);
        max[2] = max[2].max(v.z);
    }
    max.to_vec()
}

fn bounds_min(mesh: &MeshBuffers) -> Vec<f32> {
    let mut min = [f32::MAX; 3];
    for v in &mesh.positions {
        min[0] = min[0].min(v.x);
        min[1] = min[1].min(v.y);
        min[2] = min[2].min(v.z);
    }
    min.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::{GridSpec, HeightfieldMeshBuilder, NoiseField, NoiseParams};

    fn sample_mesh() -> MeshBuffers {
        let noise = NoiseField::seeded(NoiseParams::default(), 5);
        HeightfieldMeshBuilder::generate(GridSpec::new(2, 2), &noise).unwrap()
    }

    #[test]
    fn test_obj_contains_all_sections() {
        let obj = to_obj(&sample_mesh());

        assert!(obj.contains("v "));
        assert!(obj.contains("vt "));
        assert!(obj.contains("vn "));
        assert!(obj.contains("f "));
        assert_eq!(obj.matches("\nv ").count(), 9);
        assert_eq!(obj.matches("f ").count(), 8);
    }

    #[test]
    fn test_obj_faces_are_one_based() {
        let obj = to_obj(&sample_mesh());
        assert!(!obj.contains("f 0/"));
    }

    #[test]
    fn test_gltf_json_is_well_formed() {
        let mesh = sample_mesh();
        let gltf = to_gltf_json(&mesh, "terrain");
        let parsed: serde_json::Value = serde_json::from_str(&gltf).unwrap();

        assert_eq!(parsed["asset"]["version"], "2.0");
        assert_eq!(parsed["nodes"][0]["name"], "terrain");
        assert_eq!(parsed["accessors"][0]["count"], 9);
        assert_eq!(parsed["accessors"][3]["count"], 24);
    }

    #[test]
    fn test_gltf_bounds_cover_lattice() {
        let mesh = sample_mesh();
        let gltf = to_gltf_json(&mesh, "terrain");
        let parsed: serde_json::Value = serde_json::from_str(&gltf).unwrap();

        assert_eq!(parsed["accessors"][0]["max"][0], 2.0);
        assert_eq!(parsed["accessors"][0]["min"][0], 0.0);
        assert_eq!(parsed["accessors"][0]["max"][2], 2.0);
    }
}
