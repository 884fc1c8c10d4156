//! Fake GPU for tests.

use std::cell::RefCell;

use crate::backend::{Backend, TextureDesc};
use crate::format::FormatTraits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        id: u32,
        size: glam::UVec2,
        format: wgpu::TextureFormat,
    },
    Write {
        id: u32,
        origin: glam::UVec2,
        size: glam::UVec2,
        len: usize,
    },
}

/// Records every call; textures are just sequential ids.
pub struct FakeBackend {
    max_dimension: u32,
    next_id: RefCell<u32>,
    calls: RefCell<Vec<Call>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            max_dimension: 8192,
            next_id: RefCell::new(0),
            calls: RefCell::new(vec![]),
        }
    }
}

impl FakeBackend {
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn creates(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Create { .. }))
            .count()
    }
}

impl Backend for FakeBackend {
    type Texture = u32;

    fn max_texture_dimension(&self) -> u32 {
        self.max_dimension
    }

    fn create_texture(&self, desc: &TextureDesc) -> u32 {
        let mut next_id = self.next_id.borrow_mut();
        let id = *next_id;
        *next_id += 1;
        self.calls.borrow_mut().push(Call::Create {
            id,
            size: desc.size,
            format: desc.format,
        });
        id
    }

    fn write_texture(
        &self,
        texture: &u32,
        origin: glam::UVec2,
        size: glam::UVec2,
        _traits: &FormatTraits,
        data: &[u8],
    ) {
        self.calls.borrow_mut().push(Call::Write {
            id: *texture,
            origin,
            size,
            len: data.len(),
        });
    }
}
