/// Row-major flat grid. No per-cell objects, f32 friendly.
/// Dimensions are fixed at construction; nothing in the crate resizes a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

/// Elevation grid. Every terrain operation reads and writes one of these in place.
pub type HeightMap = Grid<f32>;

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    pub fn fill(&mut self, v: T) {
        self.data.iter_mut().for_each(|c| *c = v);
    }
}

impl Grid<f32> {
    #[inline]
    pub fn add(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] += v;
    }

    /// Smallest elevation; `f32::INFINITY` for an empty grid.
    pub fn min_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Largest elevation; `f32::NEG_INFINITY` for an empty grid.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        // f64 accumulator: large maps lose the low bits otherwise.
        let total: f64 = self.data.iter().map(|&v| v as f64).sum();
        (total / self.data.len() as f64) as f32
    }
}

/// Normalize a coordinate onto `[0, period)`.
/// Every wrap-aware branch in the crate (diamond step, compositor, smoother) goes through here.
#[inline]
pub fn wrap(coord: isize, period: usize) -> usize {
    debug_assert!(period > 0);
    coord.rem_euclid(period as isize) as usize
}

/// 8-connected neighbors with wrapping on both axes (torus).
pub fn neighbors8_torus(x: usize, y: usize, w: usize, h: usize) -> [(usize, usize); 8] {
    let offsets: [(isize, isize); 8] = [
        (-1, -1), (0, -1), (1, -1),
        (-1, 0),           (1, 0),
        (-1, 1),  (0, 1),  (1, 1),
    ];
    let mut out = [(0usize, 0usize); 8];
    for (slot, (dx, dy)) in out.iter_mut().zip(offsets) {
        *slot = (wrap(x as isize + dx, w), wrap(y as isize + dy, h));
    }
    out
}
