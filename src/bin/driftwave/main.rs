//! driftwave - generative ambient demo
//!
//! Opens the default output device, schedules overlapping wavetable voices
//! at a slow cadence, and reaps expired ones between passes. Pass a file
//! path as the first argument to mirror the session into a WAV file:
//!
//!   cargo run -- session.wav

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;

use driftwave::dsp::envelope::{Breakpoint, Envelope};
use driftwave::dsp::wavetable::WaveTable;
use driftwave::engine::{AudioEngine, EngineConfig};

const SAMPLE_RATE: u32 = 48_000;
// A table as long as the sample rate supports frequencies down to 1 Hz.
const TABLE_LEN: usize = SAMPLE_RATE as usize;

/// A-minor pentatonic, low register. Everything the demo plays comes from
/// here, transposed up an octave or two.
const SCALE: [f32; 5] = [110.0, 130.81, 146.83, 164.81, 196.0];

/// How many scheduling passes the demo plays before winding down.
const PASSES: u64 = 8;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let output_path = std::env::args().nth(1).map(PathBuf::from);
    if let Some(path) = &output_path {
        println!("Mirroring output to {}", path.display());
    }

    let mut engine = AudioEngine::open(EngineConfig {
        sample_rate: SAMPLE_RATE,
        output_path,
    })?;

    println!("=== driftwave ===");
    println!("Sample rate: {} Hz", engine.sample_rate());
    println!("Playing {PASSES} passes...");

    engine.start()?;

    let stop = AtomicBool::new(false);
    run_control_loop(&mut engine, &stop)?;

    engine.stop()?;
    engine.shutdown()?;
    Ok(())
}

/// The control actor: schedule a small cluster of voices every couple of
/// seconds, reap expired ones between passes, then let the tail ring out.
/// Checks `stop` between passes so a host can cancel the loop early.
fn run_control_loop(engine: &mut AudioEngine, stop: &AtomicBool) -> Result<()> {
    // One swell envelope shared by every voice: rise, hang, fade.
    let swell = Arc::new(Envelope::from_points(vec![
        Breakpoint { time: 0.0, value: 0.0 },
        Breakpoint { time: 1.0, value: 1.0 },
        Breakpoint { time: 3.0, value: 0.6 },
        Breakpoint { time: 4.0, value: 0.0 },
    ])?);

    // Pre-generate one table per brightness level; voices share them.
    let tables: Vec<Arc<WaveTable>> = (0..8)
        .map(|level| Arc::new(WaveTable::timbre(TABLE_LEN, level)))
        .collect();

    for pass in 0..PASSES {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        // Three staggered voices per pass, walking the scale and slowly
        // brightening then mellowing across the run.
        for slot in 0..3u64 {
            let step = pass + slot;
            let freq = SCALE[(step % SCALE.len() as u64) as usize];
            let octave = (1 << (step % 3)) as f32;
            let level = ((pass + slot * 2) % 8) as u8;

            engine.add_voice(
                Arc::clone(&tables[level as usize]),
                Arc::clone(&swell),
                freq * octave,
                0.12,
                4.0,
                slot as f32 * 0.6,
            );
        }

        let reaped = engine.reap_expired();
        println!(
            "pass {:>2}: {} voices live, {} reaped",
            pass + 1,
            engine.live_voices(),
            reaped
        );

        std::thread::sleep(Duration::from_secs(2));
    }

    // Let the last swells finish before shutdown.
    while engine.live_voices() > 0 {
        std::thread::sleep(Duration::from_millis(500));
        engine.reap_expired();
    }

    Ok(())
}
