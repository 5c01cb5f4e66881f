//! Improved Perlin gradient noise over Ken Perlin's reference permutation.
//!
//! [`noise`] is a pure function of its inputs: the permutation table is a
//! compile-time constant doubled to 512 entries so corner hashes never need
//! a wrap. [`ImprovedNoise`] exposes the same function through the
//! [`noise::NoiseFn`] trait for callers that compose noise sources.

use ::noise::NoiseFn;

/// Ken Perlin's reference permutation of 0..=255.
pub const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

const fn doubled(perm: [u8; 256]) -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut i = 0;
    while i < 512 {
        table[i] = perm[i & 255];
        i += 1;
    }
    table
}

static P: [u8; 512] = doubled(PERMUTATION);

#[inline]
fn perm(i: usize) -> usize {
    P[i] as usize
}

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`.
///
/// Zero first and second derivatives at 0 and 1, which hides the lattice.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation from `a` (t = 0) to `b` (t = 1).
#[inline]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of `(x, y, z)` with one of twelve edge gradients picked by
/// the low four bits of `hash`.
#[inline]
pub fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
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

/// Lattice cell index in 0..=255 and fractional offset for one axis.
#[inline]
fn split(coord: f64) -> (usize, f64) {
    let floor = coord.floor();
    // `as i64` saturates for huge inputs; the mask keeps the cell in range.
    ((floor as i64 & 255) as usize, coord - floor)
}

/// Samples 3D improved Perlin noise.
///
/// Deterministic, total over finite inputs, and clamped into [-1, 1].
/// Non-finite inputs yield 0.
pub fn noise(x: f64, y: f64, z: f64) -> f64 {
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return 0.0;
    }

    let (xi, x) = split(x);
    let (yi, y) = split(y);
    let (zi, z) = split(z);

    let u = fade(x);
    let v = fade(y);
    let w = fade(z);

    let a = perm(xi) + yi;
    let aa = perm(a) + zi;
    let ab = perm(a + 1) + zi;
    let b = perm(xi + 1) + yi;
    let ba = perm(b) + zi;
    let bb = perm(b + 1) + zi;

    let value = lerp(
        w,
        lerp(
            v,
            lerp(u, grad(P[aa], x, y, z), grad(P[ba], x - 1.0, y, z)),
            lerp(
                u,
                grad(P[ab], x, y - 1.0, z),
                grad(P[bb], x - 1.0, y - 1.0, z),
            ),
        ),
        lerp(
            v,
            lerp(
                u,
                grad(P[aa + 1], x, y, z - 1.0),
                grad(P[ba + 1], x - 1.0, y, z - 1.0),
            ),
            lerp(
                u,
                grad(P[ab + 1], x, y - 1.0, z - 1.0),
                grad(P[bb + 1], x - 1.0, y - 1.0, z - 1.0),
            ),
        ),
    );

    value.clamp(-1.0, 1.0)
}

/// [`noise`] as a [`NoiseFn`] source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImprovedNoise;

impl NoiseFn<f64, 3> for ImprovedNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        noise(point[0], point[1], point[2])
    }
}
