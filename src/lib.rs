pub mod dsp;
pub mod engine; // Voice collection and the realtime mix loop
pub mod io;

/// Largest number of frames rendered under a single registry lock.
pub const MAX_BLOCK_SIZE: usize = 2048;
