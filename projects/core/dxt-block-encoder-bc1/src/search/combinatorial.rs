use super::push_unique;
use crate::evaluate::Evaluator;
use crate::quantize::{quantize, quantize_f32};
use crate::solution::SolutionCoordinates;
use glam::Vec3;

/// For blocks of two to four colours, reconstructs the endpoints another encoder could have
/// used to produce them and scores every pair of the reconstructed pool.
///
/// For each ordered pair `(a, b)` of colours, `a` is taken as an endpoint and `b` as the
/// 1/3, 2/3 or 1/2 entry towards the other endpoint, which is then `3b - 2a`,
/// `(3b - a) / 2` or `2b - a`. When `a` and `b` are the two 1/3 entries the endpoints are
/// `2a - b` and `2b - a`, which the reversed pair produces as well.
///
/// For each ordered triple `(a, b, c)`, `a` is taken as an endpoint with `b` and `c` as its
/// 1/3 and 2/3 entries, and the other endpoint is the average of the two estimates.
pub(super) fn recover(ev: &mut Evaluator) {
    let n = ev.table.len();
    if !(2..=4).contains(&n) || ev.best.error == 0 {
        return;
    }

    let colors: Vec<Vec3> = ev
        .table
        .colors
        .iter()
        .map(|unique| Vec3::from(unique.color.rgb().map(f32::from)))
        .collect();

    let mut pool = Vec::with_capacity(n + n * (n - 1) * 3 + n * (n - 1) * (n - 2));
    for unique in &ev.table.colors {
        push_unique(&mut pool, quantize(unique.color.rgb()));
    }
    for (i, &a) in colors.iter().enumerate() {
        for (j, &b) in colors.iter().enumerate() {
            if i == j {
                continue;
            }
            for endpoint in [b * 3.0 - a * 2.0, (b * 3.0 - a) / 2.0, b * 2.0 - a] {
                push_unique(&mut pool, quantize_f32(endpoint, false));
            }
        }
    }
    for (i, &a) in colors.iter().enumerate() {
        for (j, &b) in colors.iter().enumerate() {
            for (k, &c) in colors.iter().enumerate() {
                if i == j || j == k || i == k {
                    continue;
                }
                push_unique(&mut pool, quantize_f32(far_endpoint(a, b, c), false));
            }
        }
    }

    for i in 0..pool.len() {
        for j in i + 1..pool.len() {
            ev.evaluate(SolutionCoordinates::new(pool[i], pool[j]), false);
            if ev.best.error == 0 {
                return;
            }
        }
    }
}

/// The endpoint opposite `a` when `b` and `c` are its 1/3 and 2/3 entries.
#[inline]
fn far_endpoint(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    ((b * 3.0 - a * 2.0) + (c * 3.0 - a) / 2.0) / 2.0
}
