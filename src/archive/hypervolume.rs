use std::cmp::Ordering;

use crate::archive::EvictionPolicy;

/// Offset added beyond the normalized worst corner so that boundary members
/// keep a positive contribution.
pub const DEFAULT_REFERENCE_OFFSET: f64 = 0.01;

/// Evicts the member whose removal loses the least hypervolume.
///
/// Contributions are computed on the member set normalized per objective to
/// [0, 1] by its own extremes, against the reference point (1 + offset, ...).
/// Ties go to the earliest inserted member.
#[derive(Debug, Clone, Copy)]
pub struct HypervolumeContributionEviction {
    offset: f64,
}

impl Default for HypervolumeContributionEviction {
    fn default() -> Self {
        HypervolumeContributionEviction {
            offset: DEFAULT_REFERENCE_OFFSET,
        }
    }
}

impl HypervolumeContributionEviction {
    pub fn with_offset(offset: f64) -> Self {
        HypervolumeContributionEviction { offset }
    }
}

impl EvictionPolicy for HypervolumeContributionEviction {
    fn name(&self) -> &str {
        "hypervolume-contribution"
    }

    fn choose_victim(&mut self, objectives: &[Vec<f64>]) -> usize {
        let normalized = normalize(objectives);
        let dimension = objectives[0].len();
        let reference = vec![1.0 + self.offset; dimension];

        let total = hypervolume(&normalized, &reference);
        let mut victim = 0;
        let mut smallest = f64::INFINITY;
        for index in 0..normalized.len() {
            let rest: Vec<Vec<f64>> = normalized
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, row)| row.clone())
                .collect();
            let contribution = total - hypervolume(&rest, &reference);
            if contribution < smallest {
                smallest = contribution;
                victim = index;
            }
        }
        victim
    }
}

fn normalize(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dimension = rows[0].len();
    let mut min = vec![f64::INFINITY; dimension];
    let mut max = vec![f64::NEG_INFINITY; dimension];
    for row in rows {
        for axis in 0..dimension {
            min[axis] = min[axis].min(row[axis]);
            max[axis] = max[axis].max(row[axis]);
        }
    }
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(axis, &value)| {
                    let range = max[axis] - min[axis];
                    if range > 0.0 {
                        (value - min[axis]) / range
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

/// Exact hypervolume dominated by `points` up to the reference point
/// (minimization). Points not strictly better than the reference on every
/// axis are ignored.
pub fn hypervolume(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let rows: Vec<&[f64]> = points
        .iter()
        .map(|p| p.as_slice())
        .filter(|p| p.iter().zip(reference).all(|(value, r)| value < r))
        .collect();
    hv_recursive(&rows, reference)
}

// Slicing recursion on the last objective; two dimensions are swept directly.
fn hv_recursive(points: &[&[f64]], reference: &[f64]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    match reference.len() {
        1 => {
            let best = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
            reference[0] - best
        }
        2 => {
            let mut sorted: Vec<&[f64]> = points.to_vec();
            sorted.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(Ordering::Equal));
            let mut best = reference[1];
            let mut area = 0.0;
            for point in sorted {
                if point[1] < best {
                    area += (reference[0] - point[0]) * (best - point[1]);
                    best = point[1];
                }
            }
            area
        }
        dimension => {
            let last = dimension - 1;
            let mut order: Vec<usize> = (0..points.len()).collect();
            order.sort_by(|&a, &b| {
                points[a][last]
                    .partial_cmp(&points[b][last])
                    .unwrap_or(Ordering::Equal)
            });

            let mut volume = 0.0;
            let mut slab: Vec<Vec<f64>> = Vec::with_capacity(points.len());
            for (position, &index) in order.iter().enumerate() {
                slab.push(points[index][..last].to_vec());
                let next = if position + 1 < order.len() {
                    points[order[position + 1]][last]
                } else {
                    reference[last]
                };
                let depth = next - points[index][last];
                if depth > 0.0 {
                    let rows: Vec<&[f64]> = slab.iter().map(|p| p.as_slice()).collect();
                    volume += depth * hv_recursive(&rows, &reference[..last]);
                }
            }
            volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_box() {
        let hv = hypervolume(&[vec![0.25, 0.25]], &[1.0, 1.0]);
        assert!((hv - 0.5625).abs() < 1e-12);
    }

    #[test]
    fn union_of_two_boxes() {
        let hv = hypervolume(&[vec![1.0, 3.0], vec![2.0, 2.0]], &[4.0, 4.0]);
        assert!((hv - 5.0).abs() < 1e-12);
    }

    #[test]
    fn dominated_points_add_nothing() {
        let alone = hypervolume(&[vec![1.0, 1.0]], &[4.0, 4.0]);
        let with_dominated = hypervolume(&[vec![1.0, 1.0], vec![2.0, 2.0]], &[4.0, 4.0]);
        assert!((alone - with_dominated).abs() < 1e-12);
    }

    #[test]
    fn three_dimensional_cube() {
        let hv = hypervolume(&[vec![0.0, 0.0, 0.0]], &[1.0, 1.0, 1.0]);
        assert!((hv - 1.0).abs() < 1e-12);

        let hv = hypervolume(&[vec![0.5, 0.0, 0.0], vec![0.0, 0.5, 0.0]], &[1.0, 1.0, 1.0]);
        // Two slabs of volume 0.5 overlapping in a 0.5 * 0.5 * 1 block.
        assert!((hv - 0.75).abs() < 1e-12);
    }

    #[test]
    fn points_outside_the_reference_are_ignored() {
        let hv = hypervolume(&[vec![0.5, 0.5], vec![2.0, 0.1]], &[1.0, 1.0]);
        assert!((hv - 0.25).abs() < 1e-12);
    }
}
