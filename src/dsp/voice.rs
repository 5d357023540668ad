use std::sync::Arc;

use crate::dsp::envelope::Envelope;
use crate::dsp::wavetable::WaveTable;

/*
Voice Implementation
====================

A Voice is one scheduled synthesis event — one note. It combines a shared
wavetable (the sound's spectrum), a shared envelope (the sound's shape over
time), and private playback state (where this particular note is right now).

Vocabulary
----------

  current_sample  Signed sample counter. Negative while the voice waits for
                  its start time, then counts up through the note.

  length_samples  The note's duration converted to samples at construction.

  phase           Fractional index into the wavetable. Advances by
                  `phase_inc` per sounding sample and wraps modulo the
                  table length.

  phase_inc       freq × table_len / sample_rate. The table holds one
                  cycle, so advancing by table_len/sample_rate per sample
                  replays the cycle at 1 Hz; scaling by freq retunes it.


The State Machine
-----------------

    ┌───────────┐ counter reaches 0 ┌──────────┐ counter passes ┌─────────┐
    │ Scheduled │ ────────────────→ │ Sounding │ ─────────────→ │ Expired │
    └───────────┘                   └──────────┘     length     └─────────┘

  Scheduled   current_sample < 0. Every tick returns silence and advances
              the counter — the pre-roll wait is counted in samples.

  Sounding    0 ≤ current_sample ≤ length_samples. Ticks produce audio.
              The window is inclusive at both ends, so a voice sounds for
              length_samples + 1 ticks.

  Expired     current_sample > length_samples. Terminal: every further
              tick returns silence. The control actor reaps expired
              voices; a voice never removes itself.

Transitions only ever move rightward, driven solely by tick().


Phase Truncation
----------------

Reading the table truncates the fractional phase to an integer index with
no interpolation between neighboring samples. This is audible as a faint
aliasing grit at high frequencies and is a deliberate lo-fi characteristic
of the engine, not an oversight.
*/

/// Identifies a voice within the registry. Unique among currently live
/// voices; the engine hands them out from a monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(pub u64);

/// Where a voice is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    /// Waiting out its pre-roll; not yet audible.
    Scheduled,
    /// Producing audio.
    Sounding,
    /// Finished. Silent forever; waiting to be reaped.
    Expired,
}

/// One note: a wavetable, an envelope, a schedule, and playback state.
///
/// Voices never fail once constructed — `tick()` is infallible and safe to
/// call from the render path any number of times, including after expiry.
pub struct Voice {
    id: VoiceId,
    table: Arc<WaveTable>,
    envelope: Arc<Envelope>,
    frequency: f32,
    amplitude: f32,
    length_samples: i64,
    current_sample: i64,
    phase: f32,
    phase_inc: f32,
    elapsed_secs: f64,
    time_inc: f64,
}

impl Voice {
    /// Build a voice that waits `wait_secs`, then sounds for
    /// `duration_secs` at `frequency` Hz.
    ///
    /// The table and envelope are shared handles; the voice only ever
    /// reads them. Duration and sample rate are assumed non-negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: VoiceId,
        table: Arc<WaveTable>,
        envelope: Arc<Envelope>,
        sample_rate: u32,
        frequency: f32,
        amplitude: f32,
        duration_secs: f32,
        wait_secs: f32,
    ) -> Self {
        let phase_inc = frequency * table.len() as f32 / sample_rate as f32;

        Self {
            id,
            table,
            envelope,
            frequency,
            amplitude,
            length_samples: (duration_secs * sample_rate as f32) as i64,
            // Audio begins at sample 0; the pre-roll counts up from below.
            current_sample: -((wait_secs * sample_rate as f32) as i64),
            phase: 0.0,
            phase_inc,
            elapsed_secs: 0.0,
            time_inc: 1.0 / sample_rate as f64,
        }
    }

    /// Produce this voice's next sample and advance its state.
    ///
    /// Scheduled and expired voices return silence; either way the sample
    /// counter advances by one per call.
    pub fn tick(&mut self) -> f32 {
        if self.current_sample < 0 || self.current_sample > self.length_samples {
            self.current_sample += 1;
            return 0.0;
        }

        self.current_sample += 1;

        // Truncated table lookup — no interpolation, see module notes.
        let raw = self.amplitude * self.table.at(self.phase as usize);

        // The increment can step past the whole table in one tick when the
        // frequency exceeds the sample rate, so wrap with a modulo rather
        // than a single subtraction.
        self.phase += self.phase_inc;
        if self.phase >= self.table.len() as f32 {
            self.phase %= self.table.len() as f32;
        }

        self.elapsed_secs += self.time_inc;

        // Stretch the envelope over the note: scale amplitude by the curve
        // at this voice's playback progress.
        let fraction = self.current_sample as f32 / self.length_samples as f32;
        raw * self.envelope.value_at_fraction(fraction)
    }

    /// True once the voice has played out its full length.
    pub fn expired(&self) -> bool {
        self.current_sample > self.length_samples
    }

    pub fn state(&self) -> VoiceState {
        if self.current_sample < 0 {
            VoiceState::Scheduled
        } else if self.current_sample > self.length_samples {
            VoiceState::Expired
        } else {
            VoiceState::Sounding
        }
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Seconds of audio this voice has produced so far.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }
}
