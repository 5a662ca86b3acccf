// Closed-form area and perimeter formulas.
// Total over all reals: no positivity or triangle-inequality checks. Callers decide
// what to do with NaN output (see `ComputationResult::is_usable`).

use std::f64::consts::PI;

use crate::types::{ComputationResult, InputValues, ShapeKind};

/// Compute area and perimeter of `shape`. Missing fields count as 0.
pub fn compute(shape: ShapeKind, inputs: &InputValues) -> ComputationResult {
    let v = |key: &str| inputs.get(key);

    let (area, perimeter) = match shape {
        ShapeKind::Square => {
            let side = v("side");
            (side * side, 4.0 * side)
        }
        ShapeKind::Rectangle => {
            let (length, width) = (v("length"), v("width"));
            (length * width, 2.0 * (length + width))
        }
        ShapeKind::Circle => {
            let radius = v("radius");
            (PI * radius * radius, 2.0 * PI * radius)
        }
        ShapeKind::Triangle => (
            0.5 * v("base") * v("height"),
            v("sideA") + v("sideB") + v("sideC"),
        ),
        ShapeKind::Parallelogram => {
            let base = v("base");
            (base * v("height"), 2.0 * (base + v("side")))
        }
    };

    ComputationResult { area, perimeter }
}
