//! Random draws shared by the engines. Callers always pass the generator in,
//! so tests can seed it.

use rand::Rng;

/// True with probability `chance` percent. Values at or below zero never fire.
pub fn roll_percent<R: Rng + ?Sized>(rng: &mut R, chance: u32) -> bool {
    chance > 0 && rng.gen_range(0..100) < chance
}

/// Uniform draw in `[lo, max(lo, hi)]`.
pub fn uniform_inclusive<R: Rng + ?Sized>(rng: &mut R, lo: u64, hi: u64) -> u64 {
    let hi = hi.max(lo);
    rng.gen_range(lo..=hi)
}

/// Level or quantity draw in `[max(1, min), max(min, max)]`.
pub fn draw_at_least_one<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    let lo = min.max(1);
    let hi = max.max(min).max(lo);
    rng.gen_range(lo..=hi)
}

/// Weighted pick over `rows`, each weight floored to 1.
///
/// Draws in `[1, total]` and returns the first row whose running sum reaches
/// the draw. The last row is kept as a fallback. Returns `None` only for an
/// empty slice.
pub fn pick_weighted<'a, T, R, W>(rows: &'a [T], weight: W, rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
    W: Fn(&T) -> i32,
{
    let last = rows.last()?;
    let total: u64 = rows.iter().map(|r| weight(r).max(1) as u64).sum();
    let roll = rng.gen_range(1..=total);
    let mut cumulative = 0u64;
    for row in rows {
        cumulative += weight(row).max(1) as u64;
        if roll <= cumulative {
            return Some(row);
        }
    }
    Some(last)
}
