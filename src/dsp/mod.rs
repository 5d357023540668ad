//! Low-level synthesis primitives used by the engine's voices.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to read from inside the audio callback. Tables and
//! envelopes are immutable after construction, so any number of voices (and
//! threads) can share one through an `Arc` without further synchronization.

/// Piecewise-linear time/value amplitude curve.
pub mod envelope;
/// A single scheduled synthesis event and its lifecycle state machine.
pub mod voice;
/// Single-cycle waveform buffers and their generators.
pub mod wavetable;

pub use envelope::Envelope;
pub use voice::{Voice, VoiceId, VoiceState};
pub use wavetable::{WaveTable, WaveformKind};
