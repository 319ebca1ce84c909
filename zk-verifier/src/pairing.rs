//! Optimal ate pairing on BN254.
//!
//! The Miller loop keeps the running twist point in affine coordinates and evaluates each
//! tangent/chord line directly at the G1 argument. Line values are sparse `Fp12` elements
//! `y_P - lambda*x_P*w + (lambda*x_T - y_T)*w^3`; vertical lines lie in `Fp6` and are skipped
//! since the final exponentiation maps them to one.

use crate::constants::{ate_loop_count, final_exponent_hard_part};
use crate::curve::{G1Affine, G2Affine};
use crate::error::Result;
use crate::field::fp12::frobenius_coefficients;
use crate::field::{Field, Fp12, Fp2, Fp6, Fr};
use std::ops::{Mul, MulAssign};

/// Element of the order-r subgroup of `Fp12*` produced by the pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gt(Fp12);

impl Gt {
    pub fn identity() -> Self {
        Self(Fp12::ONE)
    }

    pub fn is_identity(&self) -> bool {
        self.0 == Fp12::ONE
    }

    pub fn pow(&self, exp: &Fr) -> Self {
        Self(self.0.pow(&exp.into_limbs()))
    }

    /// Elements of `Gt` have norm one, so conjugation inverts them.
    pub fn inverse(&self) -> Self {
        Self(self.0.conjugate())
    }

    pub fn as_fp12(&self) -> &Fp12 {
        &self.0
    }
}

impl Mul for Gt {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl MulAssign for Gt {
    fn mul_assign(&mut self, rhs: Self) {
        self.0 *= rhs.0;
    }
}

fn line_value(lambda: Fp2, t: &G2Affine, p: &G1Affine) -> Fp12 {
    Fp12::new(
        Fp6::from(Fp2::from(p.y)),
        Fp6::new(-lambda.mul_by_fq(p.x), lambda * t.x - t.y, Fp2::ZERO),
    )
}

/// `T <- 2T`, returning the tangent line at `T` evaluated at `P`.
fn doubling_step(t: &mut G2Affine, p: &G1Affine) -> Result<Fp12> {
    if t.infinity {
        return Ok(Fp12::ONE);
    }
    if t.y.is_zero() {
        *t = G2Affine::identity();
        return Ok(Fp12::ONE);
    }
    let xx = t.x.square();
    let lambda = (xx.double() + xx) * t.y.double().inverse()?;
    let line = line_value(lambda, t, p);
    let x3 = lambda.square() - t.x.double();
    let y3 = lambda * (t.x - x3) - t.y;
    *t = G2Affine::new_unchecked(x3, y3);
    Ok(line)
}

/// `T <- T + Q`, returning the chord through `T` and `Q` evaluated at `P`.
fn addition_step(t: &mut G2Affine, q: &G2Affine, p: &G1Affine) -> Result<Fp12> {
    if q.infinity {
        return Ok(Fp12::ONE);
    }
    if t.infinity {
        *t = *q;
        return Ok(Fp12::ONE);
    }
    if t.x == q.x {
        if t.y == q.y {
            return doubling_step(t, p);
        }
        *t = G2Affine::identity();
        return Ok(Fp12::ONE);
    }
    let lambda = (q.y - t.y) * (q.x - t.x).inverse()?;
    let line = line_value(lambda, t, p);
    let x3 = lambda.square() - t.x - q.x;
    let y3 = lambda * (t.x - x3) - t.y;
    *t = G2Affine::new_unchecked(x3, y3);
    Ok(line)
}

/// `(x, y) -> (conj(x) * gamma_2, conj(y) * gamma_3)`: the p-power Frobenius carried
/// through the twist, which acts as multiplication by `p` on G2.
fn twist_frobenius(q: &G2Affine) -> G2Affine {
    if q.infinity {
        return *q;
    }
    let g = frobenius_coefficients();
    G2Affine::new_unchecked(q.x.conjugate() * g[2], q.y.conjugate() * g[3])
}

/// Product of the Miller loop values of all pairs, sharing the `f` squarings.
///
/// Pairs with an identity point contribute one.
pub fn multi_miller_loop(pairs: &[(G1Affine, G2Affine)]) -> Result<Fp12> {
    let pairs: Vec<&(G1Affine, G2Affine)> = pairs
        .iter()
        .filter(|(p, q)| !p.is_identity() && !q.is_identity())
        .collect();
    tracing::trace!(pairs = pairs.len(), "miller loop");

    let mut ts: Vec<G2Affine> = pairs.iter().map(|(_, q)| *q).collect();
    let mut f = Fp12::ONE;

    let loop_count = ate_loop_count();
    let bits = 128 - loop_count.leading_zeros();
    for i in (0..bits - 1).rev() {
        f = f.square();
        for ((p, q), t) in pairs.iter().zip(ts.iter_mut()) {
            f *= doubling_step(t, p)?;
            if (loop_count >> i) & 1 == 1 {
                f *= addition_step(t, q, p)?;
            }
        }
    }

    for ((p, q), t) in pairs.iter().zip(ts.iter_mut()) {
        let q1 = twist_frobenius(q);
        let q2 = -twist_frobenius(&q1);
        f *= addition_step(t, &q1, p)?;
        f *= addition_step(t, &q2, p)?;
    }

    Ok(f)
}

/// Raises a Miller loop output to `(p^12 - 1) / r`.
pub fn final_exponentiation(f: &Fp12) -> Result<Gt> {
    // Easy part: f^((p^6 - 1)(p^2 + 1)).
    let f1 = f.conjugate() * f.inverse()?;
    let f2 = f1.frobenius_map(2) * f1;
    // Hard part: (p^4 - p^2 + 1) / r.
    Ok(Gt(f2.pow(final_exponent_hard_part())))
}

pub fn pairing(p: &G1Affine, q: &G2Affine) -> Result<Gt> {
    multi_pairing(&[(*p, *q)])
}

/// `prod e(P_i, Q_i)` with a single final exponentiation.
pub fn multi_pairing(pairs: &[(G1Affine, G2Affine)]) -> Result<Gt> {
    final_exponentiation(&multi_miller_loop(pairs)?)
}

/// True iff `prod e(P_i, Q_i) == 1`; the check behind the EVM pairing precompile.
pub fn pairing_check(pairs: &[(G1Affine, G2Affine)]) -> Result<bool> {
    Ok(multi_pairing(pairs)?.is_identity())
}
