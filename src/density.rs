use std::cmp::Ordering;

use crate::error::{Error, Result};

/// NSGA-II crowding distance over one front of mutually non-dominated rows.
///
/// Boundary solutions on any objective receive an infinite score; interior
/// solutions accumulate the normalized gap between their neighbours on each
/// axis. Higher means less crowded. An objective with zero range contributes
/// nothing. Fronts of one or two solutions are all boundary.
///
/// The rows must share one objective dimension; ranking and the archive
/// validate this before calling.
pub fn crowding_distance(front: &[Vec<f64>]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }
    let dimension = front[0].len();
    debug_assert!(front.iter().all(|row| row.len() == dimension));

    let mut distances = vec![0.0f64; n];
    for axis in 0..dimension {
        let mut order: Vec<usize> = (0..n).collect();
        // Stable sort keeps tie handling deterministic.
        order.sort_by(|&a, &b| {
            front[a][axis]
                .partial_cmp(&front[b][axis])
                .unwrap_or(Ordering::Equal)
        });

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let min = front[order[0]][axis];
        let max = front[order[n - 1]][axis];
        let range = max - min;
        if range > 0.0 {
            for i in 1..n - 1 {
                if distances[order[i]].is_finite() {
                    let gap = front[order[i + 1]][axis] - front[order[i - 1]][axis];
                    distances[order[i]] += gap / range;
                }
            }
        }
    }

    distances
}

/// Crowding distance restricted to the epsilon-ball around an interest point
/// in objective space.
///
/// Members outside the ball are excluded from the pool and get `None`;
/// members inside get the crowding distance computed among the in-ball subset
/// only.
pub fn preference_distance(
    front: &[Vec<f64>],
    interest_point: &[f64],
    epsilon: f64,
) -> Result<Vec<Option<f64>>> {
    if front.is_empty() {
        return Ok(Vec::new());
    }
    let dimension = front[0].len();
    if interest_point.len() != dimension {
        return Err(Error::DimensionMismatch {
            expected: dimension,
            got: interest_point.len(),
        });
    }

    let in_ball: Vec<usize> = front
        .iter()
        .enumerate()
        .filter(|(_, row)| euclidean(row, interest_point) <= epsilon)
        .map(|(i, _)| i)
        .collect();

    let subset: Vec<Vec<f64>> = in_ball.iter().map(|&i| front[i].clone()).collect();
    let scores = crowding_distance(&subset);

    let mut out = vec![None; front.len()];
    for (&index, score) in in_ball.iter().zip(scores) {
        out[index] = Some(score);
    }
    Ok(out)
}

/// Reference-direction density: the negated perpendicular distance from each
/// row to its closest reference direction. Solutions sitting close to some
/// direction score higher.
pub fn dir_score(front: &[Vec<f64>], directions: &[Vec<f64>]) -> Result<Vec<f64>> {
    if front.is_empty() {
        return Ok(Vec::new());
    }
    let dimension = front[0].len();
    for direction in directions {
        if direction.len() != dimension {
            return Err(Error::DimensionMismatch {
                expected: dimension,
                got: direction.len(),
            });
        }
    }
    if directions.is_empty() {
        return Err(Error::EmptyWeightVectorSet);
    }

    Ok(front
        .iter()
        .map(|row| {
            let nearest = directions
                .iter()
                .map(|direction| perpendicular_distance(row, direction))
                .fold(f64::INFINITY, f64::min);
            -nearest
        })
        .collect())
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

// Distance from a point to the line spanned by a reference direction.
fn perpendicular_distance(point: &[f64], direction: &[f64]) -> f64 {
    let norm: f64 = direction.iter().map(|&x| x * x).sum::<f64>().sqrt();
    let dot: f64 = direction.iter().zip(point).map(|(a, b)| a * b).sum();
    let scalar_proj = dot / norm;
    direction
        .iter()
        .zip(point)
        .map(|(&d, &p)| {
            let projected = d * scalar_proj / norm;
            (projected - p).powi(2)
        })
        .sum::<f64>()
        .sqrt()
}
