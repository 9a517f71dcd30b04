use glam::Vec2;

use crate::particle::Particle;

const HASH_X: i64 = 92_837_111;
const HASH_Y: i64 = 689_287_499;

/// Uniform spatial hash grid over the simulation bounds.
///
/// Cells are hashed into `bin_count` bins and particles are grouped by bin with
/// a counting sort, so a rebuild is O(N) with no per-bin allocation:
/// after [`rebuild`](Self::rebuild), the particles of bin `b` are
/// `dense_particle_array[partial_sums[b]..partial_sums[b + 1]]`.
pub struct SpatialHashGrid {
    cell_size: f32,
    inv_cell_size: f32,
    num_cells_x: i64,
    num_cells_y: i64,
    bin_count: usize,
    /// Start offset of each bin in `dense_particle_array`, plus a final entry equal to N.
    partial_sums: Vec<u32>,
    /// Particle indices grouped by bin, ascending within a bin.
    dense_particle_array: Vec<u32>,
    /// Bin of each particle for the current tick.
    particle_hashes: Vec<u32>,
}

impl SpatialHashGrid {
    /// Create a grid covering `[0, bounds.x] x [0, bounds.y]` for `particle_count` particles.
    ///
    /// `cell_size` should be twice the smoothing radius so the 3x3 block around a
    /// particle covers its whole kernel support.
    pub fn new(cell_size: f32, bounds: Vec2, bin_count: usize, particle_count: usize) -> Self {
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            num_cells_x: (bounds.x / cell_size).ceil() as i64,
            num_cells_y: (bounds.y / cell_size).ceil() as i64,
            bin_count,
            partial_sums: vec![0u32; bin_count + 1],
            dense_particle_array: vec![0u32; particle_count],
            particle_hashes: vec![0u32; particle_count],
        }
    }

    /// Regroup all particles by the bin of their predicted position.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        debug_assert_eq!(particles.len(), self.particle_hashes.len());

        // 1. Count particles per bin
        self.partial_sums.fill(0);
        for (i, particle) in particles.iter().enumerate() {
            let (cx, cy) = self.cell_coords(particle.predicted_position);
            let h = self.hash_cell(cx, cy);
            self.particle_hashes[i] = h as u32;
            self.partial_sums[h] += 1;
        }

        // 2. Inclusive prefix sum: partial_sums[b] = end of bin b
        for b in 1..self.partial_sums.len() {
            self.partial_sums[b] += self.partial_sums[b - 1];
        }

        // 3. Scatter back-to-front, decrementing each bin's end down to its start
        for i in (0..particles.len()).rev() {
            let h = self.particle_hashes[i] as usize;
            self.partial_sums[h] -= 1;
            self.dense_particle_array[self.partial_sums[h] as usize] = i as u32;
        }
    }

    /// Call `callback(index)` for every particle in the 3x3 block of cells
    /// around `position`.
    ///
    /// The particle at `position` itself is included. Hash collisions can add
    /// particles from unrelated cells; the caller is responsible for distance
    /// checks where they matter. A bin shared by several of the nine cells is
    /// visited once, so no index is reported twice.
    pub fn for_each_neighbor<F: FnMut(usize)>(&self, position: Vec2, mut callback: F) {
        let (cx, cy) = self.cell_coords(position);
        let mut visited = [usize::MAX; 9];
        let mut visited_count = 0;
        for dx in -1..=1_i64 {
            let x = cx + dx;
            if x < 0 || x > self.num_cells_x {
                continue;
            }
            for dy in -1..=1_i64 {
                let y = cy + dy;
                if y < 0 || y > self.num_cells_y {
                    continue;
                }
                let h = self.hash_cell(x, y);
                if visited[..visited_count].contains(&h) {
                    continue;
                }
                visited[visited_count] = h;
                visited_count += 1;
                for &index in self.bin(h) {
                    callback(index as usize);
                }
            }
        }
    }

    /// Collecting variant of [`for_each_neighbor`](Self::for_each_neighbor).
    pub fn neighbors_of(&self, position: Vec2) -> Vec<usize> {
        let mut neighbors = Vec::new();
        self.for_each_neighbor(position, |j| neighbors.push(j));
        neighbors
    }

    /// Particle indices currently stored in bin `b`.
    #[inline]
    pub fn bin(&self, b: usize) -> &[u32] {
        let start = self.partial_sums[b] as usize;
        let end = self.partial_sums[b + 1] as usize;
        &self.dense_particle_array[start..end]
    }

    /// Hash of a cell: `|HASH_X * cx + HASH_Y * cy| mod bin_count`.
    #[inline]
    pub fn hash_cell(&self, cx: i64, cy: i64) -> usize {
        let h = HASH_X.wrapping_mul(cx).wrapping_add(HASH_Y.wrapping_mul(cy));
        (h.unsigned_abs() % self.bin_count as u64) as usize
    }

    /// Cell containing `position`, clamped into `[0, num_cells_x] x [0, num_cells_y]`.
    ///
    /// Predicted positions may overshoot the walls before boundary resolution;
    /// clamping keeps a particle's own cell inside the range the neighbour query
    /// visits.
    #[inline]
    pub fn cell_coords(&self, position: Vec2) -> (i64, i64) {
        let cx = (position.x * self.inv_cell_size).floor() as i64;
        let cy = (position.y * self.inv_cell_size).floor() as i64;
        (cx.clamp(0, self.num_cells_x), cy.clamp(0, self.num_cells_y))
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn num_cells(&self) -> (i64, i64) {
        (self.num_cells_x, self.num_cells_y)
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    #[inline]
    pub fn partial_sums(&self) -> &[u32] {
        &self.partial_sums
    }

    #[inline]
    pub fn dense_particle_array(&self) -> &[u32] {
        &self.dense_particle_array
    }

    #[inline]
    pub fn particle_hashes(&self) -> &[u32] {
        &self.particle_hashes
    }
}
