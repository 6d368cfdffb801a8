//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Neon palette
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GREY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const OUTLINE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Translucent black behind text
    pub const PANEL: [f32; 4] = [0.0, 0.0, 0.0, 0.55];

    pub const PLAYER: [f32; 4] = CYAN;
    pub const OBSTACLE: [f32; 4] = [1.0, 0.1, 0.6, 1.0];
    pub const OBSTACLE_EDGE: [f32; 4] = [0.35, 0.0, 0.2, 1.0];
    pub const OBSTACLE_LIGHT: [f32; 4] = [1.0, 0.85, 0.3, 1.0];
    pub const SHARD: [f32; 4] = YELLOW;

    pub const LANE_EDGE: [f32; 4] = CYAN;
    pub const LANE_CENTER: [f32; 4] = WHITE;
    pub const GRID: [f32; 4] = [0.5, 0.5, 0.5, 0.35];
    /// Full-screen overlay behind the pause panel
    pub const DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
}
