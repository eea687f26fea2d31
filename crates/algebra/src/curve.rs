//! Short-Weierstrass curve arithmetic.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::{errors::AlgebraError, point::Point, scalar::to_bytes_32};

/// Parameters and group operations for `y^2 = x^3 + a*x + b (mod p)` with a
/// generator of prime order `n`.
#[derive(Clone, Debug)]
pub struct Curve {
    /// Field prime.
    p: BigUint,
    /// Curve coefficient `a`.
    a: BigUint,
    /// Curve coefficient `b`.
    b: BigUint,
    /// Group generator.
    g: Point,
    /// Group order.
    n: BigUint,
}

static SECP256K1: LazyLock<Curve> = LazyLock::new(|| {
    let hex = |s: &str| BigUint::parse_bytes(s.as_bytes(), 16).expect("valid hex constant");
    Curve {
        p: hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f"),
        a: BigUint::zero(),
        b: BigUint::from(7u32),
        g: Point::Affine {
            x: hex("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
            y: hex("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
        },
        n: hex("fffffffffffffffffffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"),
    }
});

/// The process-wide secp256k1 curve, built once on first use.
pub fn secp256k1() -> &'static Curve {
    &SECP256K1
}

impl Curve {
    /// The group generator.
    pub fn generator(&self) -> &Point {
        &self.g
    }

    /// The group order `n`.
    pub fn order(&self) -> &BigUint {
        &self.n
    }

    /// The field prime `p`.
    pub fn field_prime(&self) -> &BigUint {
        &self.p
    }

    fn mod_add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.p
    }

    fn mod_sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        ((a + &self.p) - b) % &self.p
    }

    fn mod_mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    /// Inverse of a nonzero field element, via Fermat (`p` is prime).
    fn mod_inv(&self, a: &BigUint) -> BigUint {
        a.modpow(&(&self.p - 2u32), &self.p)
    }

    /// Right-hand side of the curve equation at `x`.
    fn equation_rhs(&self, x: &BigUint) -> BigUint {
        let x3 = self.mod_mul(&self.mod_mul(x, x), x);
        self.mod_add(&self.mod_add(&x3, &self.mod_mul(&self.a, x)), &self.b)
    }

    /// Whether `point` satisfies the curve equation. The identity is a member.
    pub fn contains(&self, point: &Point) -> bool {
        match point.coords() {
            None => true,
            Some((x, y)) => {
                x < &self.p && y < &self.p && self.mod_mul(y, y) == self.equation_rhs(x)
            }
        }
    }

    /// Adds two points of the group.
    pub fn add(&self, lhs: &Point, rhs: &Point) -> Point {
        let (x1, y1) = match lhs.coords() {
            None => return rhs.clone(),
            Some(coords) => coords,
        };
        let (x2, y2) = match rhs.coords() {
            None => return lhs.clone(),
            Some(coords) => coords,
        };

        let slope = if x1 == x2 {
            if self.mod_add(y1, y2).is_zero() {
                // opposite points, or a doubled point with y == 0
                return Point::Infinity;
            }
            let numerator =
                self.mod_add(&self.mod_mul(&BigUint::from(3u32), &self.mod_mul(x1, x1)), &self.a);
            self.mod_mul(&numerator, &self.mod_inv(&self.mod_add(y1, y1)))
        } else {
            self.mod_mul(&self.mod_sub(y2, y1), &self.mod_inv(&self.mod_sub(x2, x1)))
        };

        let x3 = self.mod_sub(&self.mod_sub(&self.mod_mul(&slope, &slope), x1), x2);
        let y3 = self.mod_sub(&self.mod_mul(&slope, &self.mod_sub(x1, &x3)), y1);
        Point::Affine { x: x3, y: y3 }
    }

    /// Multiplies `point` by `k`, reduced modulo the group order.
    ///
    /// Walks all 256 bit positions regardless of the scalar's magnitude, so
    /// the loop structure does not depend on the secret.
    pub fn multiply(&self, k: &BigUint, point: &Point) -> Point {
        let k = k % &self.n;
        let mut acc = Point::Infinity;
        for i in (0..256u64).rev() {
            acc = self.add(&acc, &acc);
            if k.bit(i) {
                acc = self.add(&acc, point);
            }
        }
        acc
    }

    /// Serializes a point: 33 bytes with an `0x02`/`0x03` parity prefix when
    /// `compressed`, 65 bytes with the `0x04` marker and both coordinates
    /// otherwise.
    pub fn serialize_point(
        &self,
        point: &Point,
        compressed: bool,
    ) -> Result<Vec<u8>, AlgebraError> {
        let (x, y) = point
            .coords()
            .ok_or(AlgebraError::InvalidPoint("the identity has no serialization"))?;
        let mut out = Vec::with_capacity(if compressed { 33 } else { 65 });
        if compressed {
            out.push(if y.bit(0) { 0x03 } else { 0x02 });
            out.extend_from_slice(&to_bytes_32(x));
        } else {
            out.push(0x04);
            out.extend_from_slice(&to_bytes_32(x));
            out.extend_from_slice(&to_bytes_32(y));
        }
        Ok(out)
    }

    /// Parses a 33- or 65-byte point serialization, failing with
    /// [`AlgebraError::InvalidPoint`] unless the bytes name a point on the
    /// curve.
    pub fn deserialize_point(&self, bytes: &[u8]) -> Result<Point, AlgebraError> {
        match bytes {
            [prefix @ (0x02 | 0x03), x_bytes @ ..] if x_bytes.len() == 32 => {
                let x = BigUint::from_bytes_be(x_bytes);
                if x >= self.p {
                    return Err(AlgebraError::InvalidPoint("x coordinate exceeds the field prime"));
                }
                let y = self.solve_y(&x, *prefix == 0x03)?;
                Ok(Point::Affine { x, y })
            }
            [0x04, coords @ ..] if coords.len() == 64 => {
                let point = Point::Affine {
                    x: BigUint::from_bytes_be(&coords[..32]),
                    y: BigUint::from_bytes_be(&coords[32..]),
                };
                if !self.contains(&point) {
                    return Err(AlgebraError::InvalidPoint("coordinates fail the curve equation"));
                }
                Ok(point)
            }
            _ => Err(AlgebraError::InvalidPoint("unrecognized prefix or length")),
        }
    }

    /// Recovers `y` with the requested parity from `x`, for curves with
    /// `p ≡ 3 (mod 4)`.
    fn solve_y(&self, x: &BigUint, odd: bool) -> Result<BigUint, AlgebraError> {
        let rhs = self.equation_rhs(x);
        let y = rhs.modpow(&((&self.p + 1u32) >> 2usize), &self.p);
        if self.mod_mul(&y, &y) != rhs {
            return Err(AlgebraError::InvalidPoint("x coordinate has no square root"));
        }
        Ok(if y.bit(0) == odd {
            y
        } else {
            self.mod_sub(&BigUint::zero(), &y)
        })
    }
}
