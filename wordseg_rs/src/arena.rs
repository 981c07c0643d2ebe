const BLOCK_SIZE: usize = 512 * 1024;

/// A stable view into a [WordArena], represented as indices rather than a
/// borrowed slice so that owning structures stay free of self-references.
///
/// A `WordRef` remains valid for the lifetime of the arena it was pushed
/// into; blocks are append-only and never shrink.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordRef {
    block: u32,
    offset: u32,
    len: u32,
}

impl WordRef {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Append-only slab storage for word bytes.
///
/// Words are copied into fixed-capacity blocks; a block never reallocates
/// once created, and a new block is started whenever the current one cannot
/// hold the next word. Words longer than [BLOCK_SIZE] get a block of their
/// own.
#[derive(Debug, Default, Clone)]
pub struct WordArena {
    blocks: Vec<Vec<u8>>,
}

impl WordArena {
    pub fn new() -> WordArena {
        WordArena { blocks: Vec::new() }
    }

    /// Copies `bytes` into the arena and returns a stable reference to them.
    pub fn push(&mut self, bytes: &[u8]) -> WordRef {
        let need = bytes.len();
        let start_new = match self.blocks.last() {
            None => true,
            Some(block) => block.len() + need > block.capacity(),
        };
        if start_new {
            self.blocks.push(Vec::with_capacity(BLOCK_SIZE.max(need)));
        }
        // Guaranteed non-empty after the push above
        let block = self.blocks.len() - 1;
        let last = &mut self.blocks[block];
        let offset = last.len();
        last.extend_from_slice(bytes);
        WordRef {
            block: block as u32,
            offset: offset as u32,
            len: need as u32,
        }
    }

    /// Resolves a reference previously returned by [push](WordArena::push).
    pub fn get(&self, word: WordRef) -> &[u8] {
        &self.blocks[word.block as usize]
            [word.offset as usize..(word.offset + word.len) as usize]
    }
}
