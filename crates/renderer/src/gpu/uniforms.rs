use crate::compile::UniformSlot;

/// Uniform buffers must be sized in multiples of a vec4 for WebGL2.
const BLOCK_ALIGNMENT: u64 = 16;

/// GPU storage for the reflected block holding the time uniform.
pub(crate) struct TimeUniform {
    slot: UniformSlot,
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    /// Empty groups ahead of `slot.group`, bound so the layout has no holes.
    pub leading_groups: Vec<wgpu::BindGroup>,
}

impl TimeUniform {
    /// Creates the buffer and bind groups; returns the layouts for the pipeline.
    pub fn new(device: &wgpu::Device, slot: UniformSlot) -> (Self, Vec<wgpu::BindGroupLayout>) {
        let mut layouts = Vec::with_capacity(slot.group as usize + 1);
        let mut leading_groups = Vec::with_capacity(slot.group as usize);
        for _ in 0..slot.group {
            let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("empty layout"),
                entries: &[],
            });
            leading_groups.push(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("empty bind group"),
                layout: &layout,
                entries: &[],
            }));
            layouts.push(layout);
        }

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("time uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: slot.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("time uniform buffer"),
            size: block_buffer_size(slot),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("time uniform bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: slot.binding,
                resource: buffer.as_entire_binding(),
            }],
        });
        layouts.push(layout);

        (
            Self {
                slot,
                buffer,
                bind_group,
                leading_groups,
            },
            layouts,
        )
    }

    pub fn slot(&self) -> UniformSlot {
        self.slot
    }

    pub fn write(&self, queue: &wgpu::Queue, slot: UniformSlot, seconds: f32) {
        queue.write_buffer(&self.buffer, u64::from(slot.offset), bytemuck::bytes_of(&seconds));
    }
}

pub(crate) fn block_buffer_size(slot: UniformSlot) -> u64 {
    let size = u64::from(slot.block_size.max(slot.offset + 4));
    size.div_ceil(BLOCK_ALIGNMENT) * BLOCK_ALIGNMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(offset: u32, block_size: u32) -> UniformSlot {
        UniformSlot {
            group: 0,
            binding: 0,
            offset,
            block_size,
        }
    }

    #[test]
    fn single_float_block_rounds_up_to_vec4() {
        assert_eq!(block_buffer_size(slot(0, 4)), 16);
        assert_eq!(block_buffer_size(slot(0, 16)), 16);
    }

    #[test]
    fn buffer_always_covers_member() {
        assert_eq!(block_buffer_size(slot(20, 0)), 32);
        assert_eq!(block_buffer_size(slot(12, 16)), 16);
    }
}
