use crate::archive::EvictionPolicy;
use crate::error::{Error, Result};

// 2^(bisections * objectives) hypercubes must stay addressable.
const MAX_GRID_BITS: usize = 24;

/// A recursively bisected hyper-grid over objective space.
///
/// Each objective axis is split into 2^bisections ranges between the current
/// lower and upper limits; a solution's location is the concatenation of its
/// per-axis range indices. Limits are recomputed from the population whenever
/// the grid is rebuilt.
#[derive(Debug, Clone)]
pub struct AdaptiveGrid {
    bisections: usize,
    objectives: usize,
    hypercubes: Vec<u32>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    division_size: Vec<f64>,
    most_populated: usize,
}

impl AdaptiveGrid {
    pub fn new(bisections: usize, objectives: usize) -> Result<Self> {
        if bisections == 0 || objectives == 0 || bisections * objectives > MAX_GRID_BITS {
            return Err(Error::InvalidGrid {
                bisections,
                objectives,
            });
        }
        Ok(AdaptiveGrid {
            bisections,
            objectives,
            hypercubes: vec![0; 1 << (bisections * objectives)],
            lower: vec![0.0; objectives],
            upper: vec![0.0; objectives],
            division_size: vec![0.0; objectives],
            most_populated: 0,
        })
    }

    pub fn bisections(&self) -> usize {
        self.bisections
    }

    /// Recompute the limits from the given rows and re-add every row.
    pub fn update_grid(&mut self, rows: &[Vec<f64>]) {
        for axis in 0..self.objectives {
            self.lower[axis] = f64::INFINITY;
            self.upper[axis] = f64::NEG_INFINITY;
        }
        for row in rows {
            for axis in 0..self.objectives {
                self.lower[axis] = self.lower[axis].min(row[axis]);
                self.upper[axis] = self.upper[axis].max(row[axis]);
            }
        }
        for axis in 0..self.objectives {
            self.division_size[axis] = self.upper[axis] - self.lower[axis];
        }

        self.hypercubes.iter_mut().for_each(|count| *count = 0);
        self.most_populated = 0;
        for row in rows {
            // In-bounds by construction right after a limit update.
            if let Some(location) = self.location(row) {
                self.hypercubes[location] += 1;
                if self.hypercubes[location] > self.hypercubes[self.most_populated] {
                    self.most_populated = location;
                }
            }
        }
        tracing::debug!(rows = rows.len(), "adaptive grid rebuilt");
    }

    /// Hypercube index of a point, or None when it falls outside the current
    /// limits (the caller must then rebuild the grid).
    pub fn location(&self, f: &[f64]) -> Option<usize> {
        let ranges_per_axis = 1usize << self.bisections;
        let mut location = 0usize;
        for axis in 0..self.objectives {
            let value = f[axis];
            if value < self.lower[axis] || value > self.upper[axis] {
                return None;
            }
            let mut position = 0usize;
            if value == self.upper[axis] {
                position = ranges_per_axis - 1;
            } else if value > self.lower[axis] {
                let mut slice = self.division_size[axis];
                let mut account = self.lower[axis];
                let mut ranges = ranges_per_axis;
                for _ in 0..self.bisections {
                    slice /= 2.0;
                    ranges /= 2;
                    if value > account + slice {
                        position += ranges;
                        account += slice;
                    }
                }
            }
            location += position << (axis * self.bisections);
        }
        Some(location)
    }

    /// Index of the hypercube currently holding the most solutions.
    pub fn most_populated(&self) -> usize {
        self.most_populated
    }

    pub fn density(&self, location: usize) -> u32 {
        self.hypercubes[location]
    }
}

/// Evicts a member of the most populated grid cell; among those, the
/// earliest inserted. The grid is rebuilt from the archive contents on every
/// eviction, which also covers candidates outside the previous bounds.
#[derive(Debug, Clone)]
pub struct AdaptiveGridEviction {
    grid: AdaptiveGrid,
}

impl AdaptiveGridEviction {
    pub fn new(bisections: usize, objectives: usize) -> Result<Self> {
        Ok(AdaptiveGridEviction {
            grid: AdaptiveGrid::new(bisections, objectives)?,
        })
    }

    pub fn grid(&self) -> &AdaptiveGrid {
        &self.grid
    }
}

impl EvictionPolicy for AdaptiveGridEviction {
    fn name(&self) -> &str {
        "adaptive-grid"
    }

    fn choose_victim(&mut self, objectives: &[Vec<f64>]) -> usize {
        self.grid.update_grid(objectives);
        let crowded = self.grid.most_populated();
        objectives
            .iter()
            .position(|row| self.grid.location(row) == Some(crowded))
            .unwrap_or(0)
    }

    fn check_dimension(&self, objectives_len: usize) -> Result<()> {
        if objectives_len != self.grid.objectives {
            return Err(Error::DimensionMismatch {
                expected: self.grid.objectives,
                got: objectives_len,
            });
        }
        Ok(())
    }
}
