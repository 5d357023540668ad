use std::sync::Mutex;

use crate::dsp::voice::{Voice, VoiceId};

/// The mutation-guarded, insertion-ordered collection of live voices.
///
/// One exclusive lock is shared by both actors: the control actor takes it
/// to add and reap voices, the render actor takes it to sum them. A voice
/// is therefore never observed half-constructed, and no removal happens
/// mid-sum. The flip side is that the render actor can block behind a
/// control-side mutation; keep control-side critical sections short.
///
/// Voices live in a contiguous `Vec` and are owned by the registry
/// outright. Insertion order is preserved, including across reaps.
#[derive(Default)]
pub struct VoiceRegistry {
    voices: Mutex<Vec<Voice>>,
}

impl VoiceRegistry {
    pub fn new() -> Self {
        Self {
            voices: Mutex::new(Vec::new()),
        }
    }

    /// Append a voice. Control actor only; blocks while the render actor
    /// is mid-sum.
    pub fn add(&self, voice: Voice) {
        self.voices.lock().unwrap().push(voice);
    }

    /// Remove every expired voice, preserving the order of survivors.
    /// Returns how many were reaped.
    ///
    /// Control actor only: the scan is unbounded in collection size and
    /// must never run on the render path.
    pub fn remove_expired(&self) -> usize {
        let mut voices = self.voices.lock().unwrap();
        let before = voices.len();
        voices.retain(|v| !v.expired());
        before - voices.len()
    }

    /// Tick every live voice once and return the unclamped arithmetic sum
    /// — one mixed output sample.
    pub fn sum(&self) -> f32 {
        let mut voices = self.voices.lock().unwrap();
        voices.iter_mut().map(Voice::tick).sum()
    }

    /// Fill a whole mono buffer, taking the lock once for the entire
    /// block rather than once per sample. This is the render actor's
    /// entry point.
    pub fn render(&self, out: &mut [f32]) {
        let mut voices = self.voices.lock().unwrap();
        for slot in out.iter_mut() {
            *slot = voices.iter_mut().map(Voice::tick).sum();
        }
    }

    /// Drop every voice, expired or not. Used at shutdown.
    pub fn clear(&self) {
        self.voices.lock().unwrap().clear();
    }

    /// Ids of the live voices, in insertion order.
    pub fn ids(&self) -> Vec<VoiceId> {
        self.voices.lock().unwrap().iter().map(Voice::id).collect()
    }

    /// Number of live voices (sounding, scheduled, or awaiting reap).
    pub fn len(&self) -> usize {
        self.voices.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.lock().unwrap().is_empty()
    }
}
