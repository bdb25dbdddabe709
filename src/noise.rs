use crate::rng::{hash2, hash3, hash4};

#[inline]
fn smootherstep(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn grad1(hash: u32, dx: f32) -> f32 {
    // Gradients in [-1, 1] at 1/8 steps, never zero.
    let g = ((hash & 7) as f32 + 1.0) / 8.0;
    if hash & 8 == 0 { g * dx } else { -g * dx }
}

#[inline]
fn grad2(hash: u32, dx: f32, dy: f32) -> f32 {
    // 16 evenly-spaced unit gradients (every 22.5°).
    match hash & 15 {
        0  =>  dx,
        1  =>  0.924 * dx + 0.383 * dy,
        2  =>  0.707 * (dx + dy),
        3  =>  0.383 * dx + 0.924 * dy,
        4  =>  dy,
        5  => -0.383 * dx + 0.924 * dy,
        6  =>  0.707 * (-dx + dy),
        7  => -0.924 * dx + 0.383 * dy,
        8  => -dx,
        9  => -0.924 * dx - 0.383 * dy,
        10 =>  0.707 * (-dx - dy),
        11 => -0.383 * dx - 0.924 * dy,
        12 => -dy,
        13 =>  0.383 * dx - 0.924 * dy,
        14 =>  0.707 * (dx - dy),
        _  =>  0.924 * dx - 0.383 * dy,
    }
}

#[inline]
fn grad3(hash: u32, x: f32, y: f32, z: f32) -> f32 {
    // 12 cube-edge directions, padded to 16.
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[inline]
fn grad4(hash: u32, x: f32, y: f32, z: f32, w: f32) -> f32 {
    // 32 directions: one axis dropped, the other three at +-1.
    let h = hash & 31;
    let (a, b, c) = match h >> 3 {
        0 => (y, z, w),
        1 => (x, z, w),
        2 => (x, y, w),
        _ => (x, y, z),
    };
    (if h & 1 == 0 { a } else { -a }) + (if h & 2 == 0 { b } else { -b }) + (if h & 4 == 0 { c } else { -c })
}

#[inline]
fn lattice_pair(i: i32, period: Option<i32>) -> (i32, i32) {
    match period {
        Some(p) if p > 0 => (i.rem_euclid(p), (i + 1).rem_euclid(p)),
        _ => (i, i + 1),
    }
}

/// Seeded gradient noise. Deterministic for a given seed, continuous in its
/// inputs, approximately within [-1, 1].
///
/// The periodic variants repeat with the given integer lattice period, which
/// makes them tile on a cylindrical or toroidal map.
#[derive(Clone, Copy, Debug)]
pub struct GradientNoise {
    seed: u32,
}

impl GradientNoise {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn reseed(&mut self, seed: u32) {
        self.seed = seed;
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn noise1(&self, x: f32) -> f32 {
        self.lattice1(x, None)
    }

    pub fn pnoise1(&self, x: f32, px: i32) -> f32 {
        self.lattice1(x, Some(px))
    }

    pub fn noise2(&self, x: f32, y: f32) -> f32 {
        self.lattice2(x, y, None)
    }

    pub fn pnoise2(&self, x: f32, y: f32, px: i32, py: i32) -> f32 {
        self.lattice2(x, y, Some((px, py)))
    }

    pub fn noise3(&self, x: f32, y: f32, z: f32) -> f32 {
        self.lattice3(x, y, z, None)
    }

    pub fn pnoise3(&self, x: f32, y: f32, z: f32, px: i32, py: i32, pz: i32) -> f32 {
        self.lattice3(x, y, z, Some((px, py, pz)))
    }

    pub fn noise4(&self, x: f32, y: f32, z: f32, w: f32) -> f32 {
        self.lattice4([x, y, z, w], None)
    }

    pub fn pnoise4(&self, x: f32, y: f32, z: f32, w: f32, period: [i32; 4]) -> f32 {
        self.lattice4([x, y, z, w], Some(period))
    }

    fn lattice1(&self, x: f32, period: Option<i32>) -> f32 {
        let ix = x.floor() as i32;
        let fx = x - ix as f32;
        let (i0, i1) = lattice_pair(ix, period);
        let a = grad1(hash2(i0, 0, self.seed), fx);
        let b = grad1(hash2(i1, 0, self.seed), fx - 1.0);
        // Raw range is [-0.5, 0.5]
        lerp(a, b, smootherstep(fx)) * 2.0
    }

    fn lattice2(&self, x: f32, y: f32, period: Option<(i32, i32)>) -> f32 {
        let ix = x.floor() as i32;
        let iy = y.floor() as i32;
        let fx = x - ix as f32;
        let fy = y - iy as f32;
        let sx = smootherstep(fx);
        let sy = smootherstep(fy);

        let (x0, x1) = lattice_pair(ix, period.map(|p| p.0));
        let (y0, y1) = lattice_pair(iy, period.map(|p| p.1));

        let v00 = grad2(hash2(x0, y0, self.seed), fx, fy);
        let v10 = grad2(hash2(x1, y0, self.seed), fx - 1.0, fy);
        let v01 = grad2(hash2(x0, y1, self.seed), fx, fy - 1.0);
        let v11 = grad2(hash2(x1, y1, self.seed), fx - 1.0, fy - 1.0);

        let a = lerp(v00, v10, sx);
        let b = lerp(v01, v11, sx);
        // Scale to approximately [-1, 1] range (raw range is ~[-0.7, 0.7])
        lerp(a, b, sy) * 1.414
    }

    fn lattice3(&self, x: f32, y: f32, z: f32, period: Option<(i32, i32, i32)>) -> f32 {
        let ix = x.floor() as i32;
        let iy = y.floor() as i32;
        let iz = z.floor() as i32;
        let fx = x - ix as f32;
        let fy = y - iy as f32;
        let fz = z - iz as f32;
        let (u, v, w) = (smootherstep(fx), smootherstep(fy), smootherstep(fz));
        let xs = lattice_pair(ix, period.map(|p| p.0));
        let ys = lattice_pair(iy, period.map(|p| p.1));
        let zs = lattice_pair(iz, period.map(|p| p.2));
        let s = self.seed;

        let c = |dx: i32, dy: i32, dz: i32| {
            let hx = if dx == 0 { xs.0 } else { xs.1 };
            let hy = if dy == 0 { ys.0 } else { ys.1 };
            let hz = if dz == 0 { zs.0 } else { zs.1 };
            grad3(hash3(hx, hy, hz, s), fx - dx as f32, fy - dy as f32, fz - dz as f32)
        };

        let x00 = lerp(c(0, 0, 0), c(1, 0, 0), u);
        let x10 = lerp(c(0, 1, 0), c(1, 1, 0), u);
        let x01 = lerp(c(0, 0, 1), c(1, 0, 1), u);
        let x11 = lerp(c(0, 1, 1), c(1, 1, 1), u);
        // Raw range is ~[-1, 1] for the 12-edge set.
        lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
    }

    fn lattice4(&self, p: [f32; 4], period: Option<[i32; 4]>) -> f32 {
        let cell = p.map(|v| v.floor() as i32);
        let mut frac = [0.0f32; 4];
        let mut pairs = [(0i32, 0i32); 4];
        for a in 0..4 {
            frac[a] = p[a] - cell[a] as f32;
            pairs[a] = lattice_pair(cell[a], period.map(|q| q[a]));
        }
        let fade = frac.map(smootherstep);

        // Corner bit a set means the upper lattice line on axis a.
        let corner = |bits: usize| {
            let pick = |a: usize| if bits >> a & 1 == 0 { pairs[a].0 } else { pairs[a].1 };
            let off = |a: usize| frac[a] - (bits >> a & 1) as f32;
            grad4(
                hash4(pick(0), pick(1), pick(2), pick(3), self.seed),
                off(0),
                off(1),
                off(2),
                off(3),
            )
        };

        // Collapse one axis at a time, x first.
        let mut vals: Vec<f32> = (0..16).map(corner).collect();
        for a in 0..4 {
            vals = vals.chunks(2).map(|ab| lerp(ab[0], ab[1], fade[a])).collect();
        }
        vals[0]
    }
}
