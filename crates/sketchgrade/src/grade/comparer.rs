//! Pairwise sample comparator with a failure budget.

/// Slope tolerated by the geometric slack: 15 degrees.
const SLACK_ANGLE: f64 = std::f64::consts::PI / 12.0;

/// Ordering required between consecutive samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    LesserOrEqual,
    GreaterOrEqual,
}

impl Comparison {
    /// Cost of the pair `(a, b)`: 0 when the order holds, 0.5 when it holds within
    /// `delta · tan 15°`, 1 otherwise.
    pub fn cost(self, a: f64, b: f64, delta: f64) -> f64 {
        let slack = delta * SLACK_ANGLE.tan();
        let (holds, nearly) = match self {
            Comparison::LesserOrEqual => (a <= b, a <= b + slack),
            Comparison::GreaterOrEqual => (a >= b, a >= b - slack),
        };
        if holds {
            0.0
        } else if nearly {
            0.5
        } else {
            1.0
        }
    }
}

/// Walk consecutive pairs of `values`, spending `budget` on violations.
///
/// `deltas[i]` is the x-step (graph units) between sample `i` and `i + 1`; `scale`
/// converts it into y graph units of equal pixel length. A violating pair drops its
/// left sample and the walk resumes at the right one. Returns the indices of the
/// violating pairs on failure.
pub fn always_holds(
    cmp: Comparison,
    values: &[f64],
    deltas: &[f64],
    scale: f64,
    budget: f64,
) -> Result<(), Vec<usize>> {
    let mut left = budget;
    let mut failed = Vec::new();
    for (i, pair) in values.windows(2).enumerate() {
        let delta = deltas.get(i).copied().unwrap_or(0.0);
        let cost = cmp.cost(pair[0], pair[1], delta * scale);
        if cost > 0.0 {
            failed.push(i);
            left -= cost;
            if left < 0.0 {
                return Err(failed);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_has_three_levels() {
        let c = Comparison::LesserOrEqual;
        assert_eq!(c.cost(1.0, 2.0, 1.0), 0.0);
        assert_eq!(c.cost(2.1, 2.0, 1.0), 0.5);
        assert_eq!(c.cost(3.0, 2.0, 1.0), 1.0);
        let g = Comparison::GreaterOrEqual;
        assert_eq!(g.cost(2.0, 1.0, 0.0), 0.0);
        assert_eq!(g.cost(1.0, 2.0, 0.0), 1.0);
    }

    #[test]
    fn budget_is_cumulative() {
        let vals = [0.0, 1.0, 0.0, 2.0, 1.0, 3.0, 2.0, 4.0];
        let steps = [0.0; 8];
        assert!(always_holds(Comparison::LesserOrEqual, &vals, &steps, 1.0, 3.0).is_ok());
        let err = always_holds(Comparison::LesserOrEqual, &vals, &steps, 1.0, 2.0).unwrap_err();
        assert_eq!(err, vec![1, 3, 5]);
    }
}
