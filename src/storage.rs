//! Fixed-capacity in-RAM object content store.
//!
//! [`RamObject`] backs a single object with a heapless buffer and
//! implements [`ObjectIo`] for it. The per-read chunk cap models a
//! transport MTU, so reads larger than one chunk exercise the engine's
//! send-complete chaining.

use heapless::Vec;

use crate::error::IoError;
use crate::object::{Metadata, Object, ObjectId, Properties};
use crate::ports::ObjectIo;

/// Default per-read chunk cap (bytes).
const DEFAULT_CHUNK_CAP: usize = 256;

/// One object's content in RAM, capacity `N` bytes.
pub struct RamObject<const N: usize> {
    id: ObjectId,
    data: Vec<u8, N>,
    chunk_cap: usize,
    last_read_done: Option<u64>,
}

impl<const N: usize> RamObject<N> {
    /// An empty object.
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            data: Vec::new(),
            chunk_cap: DEFAULT_CHUNK_CAP,
            last_read_done: None,
        }
    }

    /// An object pre-filled with `content`. `None` if `content` exceeds
    /// the capacity.
    pub fn with_content(id: ObjectId, content: &[u8]) -> Option<Self> {
        let mut obj = Self::new(id);
        obj.data = Vec::from_slice(content).ok()?;
        Some(obj)
    }

    /// Cap the number of bytes served per `read_chunk` call.
    pub fn set_chunk_cap(&mut self, cap: usize) {
        self.chunk_cap = cap.max(1);
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn content(&self) -> &[u8] {
        &self.data
    }

    /// Build the OACP-side view of this object: current size is the
    /// valid content length, allocation is the buffer capacity.
    pub fn object(&self, props: Properties) -> Object {
        Object::new(
            self.id,
            Metadata {
                cur_size: self.data.len() as u32,
                alloc_size: N as u32,
                props,
            },
        )
    }

    /// The final offset of the last completed read, if any.
    pub fn take_read_done(&mut self) -> Option<u64> {
        self.last_read_done.take()
    }
}

impl<const N: usize> ObjectIo for RamObject<N> {
    fn read_chunk(&mut self, id: ObjectId, max_len: usize, offset: u64) -> Result<&[u8], IoError> {
        if id != self.id {
            return Err(IoError::Failed);
        }

        let start = usize::try_from(offset).map_err(|_| IoError::OutOfBounds)?;
        if start > self.data.len() {
            return Err(IoError::OutOfBounds);
        }

        let end = (start + max_len.min(self.chunk_cap)).min(self.data.len());
        Ok(&self.data[start..end])
    }

    fn write_chunk(
        &mut self,
        id: ObjectId,
        data: &[u8],
        offset: u64,
        _remaining: usize,
    ) -> Result<usize, IoError> {
        if id != self.id {
            return Err(IoError::Failed);
        }

        let start = usize::try_from(offset).map_err(|_| IoError::OutOfBounds)?;
        let end = start + data.len();
        if start > self.data.len() || end > N {
            return Err(IoError::OutOfBounds);
        }

        if end > self.data.len() {
            self.data.resize(end, 0).map_err(|()| IoError::OutOfBounds)?;
        }
        self.data[start..end].copy_from_slice(data);

        Ok(data.len())
    }

    fn read_done(&mut self, id: ObjectId, offset: u64) {
        if id == self.id {
            self.last_read_done = Some(offset);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────
