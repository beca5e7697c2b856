use crate::gpu::GpuSprite;

/// Instances per GPU upload. The instance buffer is sized to hold one batch.
pub const DYN_QUAD_CAP: usize = 1024;

/// Fixed-capacity accumulator of sprite instances.
///
/// A full batch is handed to the sink before the next push; whatever remains
/// is handed over by [`QuadBatch::finish`].
#[derive(Debug, Clone)]
pub struct QuadBatch {
    sprites: Vec<GpuSprite>,
    capacity: usize,
    flushes: usize,
}

impl Default for QuadBatch {
    fn default() -> Self {
        Self::new(DYN_QUAD_CAP)
    }
}

impl QuadBatch {
    /// Batch flushing every `capacity` sprites. A capacity of zero is
    /// treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            sprites: Vec::with_capacity(capacity),
            capacity,
            flushes: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sprites waiting for the next flush.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Number of batches handed to a sink so far.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Queue one sprite, flushing first if the batch is full.
    pub fn push(&mut self, sprite: GpuSprite, sink: &mut impl FnMut(&[GpuSprite])) {
        if self.sprites.len() == self.capacity {
            self.flush(sink);
        }
        self.sprites.push(sprite);
    }

    /// Flush the remaining sprites, if any.
    pub fn finish(&mut self, sink: &mut impl FnMut(&[GpuSprite])) {
        if !self.sprites.is_empty() {
            self.flush(sink);
        }
    }

    fn flush(&mut self, sink: &mut impl FnMut(&[GpuSprite])) {
        tracing::trace!(sprites = self.sprites.len(), "flushing quad batch");
        sink(&self.sprites);
        self.sprites.clear();
        self.flushes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    fn sprite(i: usize) -> GpuSprite {
        GpuSprite {
            center: [i as f32, 0.0],
            ..GpuSprite::zeroed()
        }
    }

    #[test]
    fn flushes_only_full_batches_until_finish() {
        let mut batch = QuadBatch::new(4);
        let mut sizes = Vec::new();
        let mut sink = |s: &[GpuSprite]| sizes.push(s.len());

        for i in 0..10 {
            batch.push(sprite(i), &mut sink);
        }
        assert_eq!(batch.flushes(), 2);
        assert_eq!(batch.len(), 2);

        batch.finish(&mut sink);
        assert_eq!(batch.flushes(), 3);
        assert!(batch.is_empty());
        assert_eq!(sizes, [4, 4, 2]);
    }

    #[test]
    fn exact_multiple_has_no_empty_flush() {
        let mut batch = QuadBatch::new(3);
        let mut sizes = Vec::new();
        let mut sink = |s: &[GpuSprite]| sizes.push(s.len());

        for i in 0..6 {
            batch.push(sprite(i), &mut sink);
        }
        batch.finish(&mut sink);
        batch.finish(&mut sink);
        assert_eq!(sizes, [3, 3]);
    }

    #[test]
    fn order_is_preserved_across_flushes() {
        let mut batch = QuadBatch::new(2);
        let mut seen = Vec::new();
        let mut sink = |s: &[GpuSprite]| seen.extend(s.iter().map(|g| g.center[0] as usize));

        for i in 0..5 {
            batch.push(sprite(i), &mut sink);
        }
        batch.finish(&mut sink);
        assert_eq!(seen, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn default_capacity() {
        assert_eq!(QuadBatch::default().capacity(), DYN_QUAD_CAP);
        assert_eq!(QuadBatch::new(0).capacity(), 1);
    }
}
