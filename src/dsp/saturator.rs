//! Soft saturation for the feedback path.
//!
//! Recording a hot signal onto tape rounds off its peaks. Applied to the
//! echo on its way back into the delay line, that compression means each
//! repeat is a little warmer than the last and the loop can't run away.

/// Drive-compensated `tanh` soft clip.
///
/// `amount <= 0` is an exact passthrough. Otherwise `drive = 1 + 3·amount`
/// and the result is `tanh(x·drive) / drive`: close to unity gain for
/// small signals, increasingly compressed peaks as `amount` approaches 1.
/// Since `|tanh(y)| <= |y|`, the output magnitude never exceeds `|x|`.
#[inline]
pub fn saturate(x: f32, amount: f32) -> f32 {
    if amount <= 0.0 {
        return x;
    }
    let drive = 1.0 + amount * 3.0;
    (x * drive).tanh() / drive
}
