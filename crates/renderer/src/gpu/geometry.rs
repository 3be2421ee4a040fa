use wgpu::util::DeviceExt;

/// Full clip-space quad as a triangle strip: two triangles, four corners.
pub const QUAD_VERTICES: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];

pub const QUAD_VERTEX_COUNT: u32 = QUAD_VERTICES.len() as u32;

/// Two tightly packed, unnormalised floats per vertex.
pub const QUAD_STRIDE: wgpu::BufferAddress = std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress;

pub(crate) fn upload_quad(device: &wgpu::Device) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("quad vertices"),
        contents: bytemuck::cast_slice(&QUAD_VERTICES),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

pub(crate) fn position_attribute(location: u32) -> wgpu::VertexAttribute {
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: location,
    }
}
