//! Driving effects the way a plugin host does: one block per call.

use tracing::{debug, error};

use crate::effects::Effect;
use crate::error::{FxError, Result};

/// Runs one block through `effect`, never leaving `output` undefined.
///
/// A failing block is replaced by silence and logged; the host keeps
/// running. Returns `true` when the effect produced the block itself.
pub fn run_block(effect: &mut dyn Effect, input: &[f32], output: &mut [f32]) -> bool {
    match effect.process(input, output) {
        Ok(()) => true,
        Err(err) => {
            error!(effect = effect.name(), error = %err, "block failed, emitting silence");
            output.fill(0.0);
            false
        }
    }
}

/// Cycle of block lengths used to cut a signal, e.g. `[512, 480, 1024]`.
///
/// # Errors
/// `InvalidBlockSchedule` if the schedule is empty or contains a zero.
pub fn validate_schedule(schedule: &[usize]) -> Result<()> {
    if schedule.is_empty() {
        return Err(FxError::InvalidBlockSchedule("schedule is empty".into()));
    }
    if let Some(pos) = schedule.iter().position(|&len| len == 0) {
        return Err(FxError::InvalidBlockSchedule(format!(
            "block {} has zero length",
            pos
        )));
    }
    Ok(())
}

/// Renders a whole signal through `effect`, cutting it into blocks whose
/// lengths cycle through `schedule`. The last block may be shorter.
///
/// The output has the same length as `signal`. Blocks the effect rejects
/// are rendered as silence (see [`run_block`]).
///
/// # Errors
/// See [`validate_schedule`].
pub fn render(effect: &mut dyn Effect, signal: &[f32], schedule: &[usize]) -> Result<Vec<f32>> {
    validate_schedule(schedule)?;

    let mut output = vec![0.0f32; signal.len()];
    let mut pos = 0;
    let mut failed = 0usize;
    for &len in schedule.iter().cycle() {
        if pos >= signal.len() {
            break;
        }
        let end = (pos + len).min(signal.len());
        if !run_block(effect, &signal[pos..end], &mut output[pos..end]) {
            failed += 1;
        }
        pos = end;
    }

    debug!(
        effect = effect.name(),
        samples = signal.len(),
        failed_blocks = failed,
        "render finished"
    );
    Ok(output)
}
