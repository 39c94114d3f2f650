// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Taylor coefficient kernels for the power operator family.
//!
//! Link to [parent module](super)
//!
//! A variable base with a variable exponent is recorded with three result
//! variables,
//! ```text
//!     z0 = log(x) ,  z1 = z0 * y ,  z2 = exp(z1)
//! ```
//! at indices `res - 2` , `res - 1` , `res` ; its kernels compose the
//! log, multiply, and exp kernels. The single result `PowVp` and `PowPv`
//! variants use the recurrences from
//! ```text
//!     z' * x = p * z * x'        (z = x^p)
//!     z'     = log(p) * z * y'   (z = p^y)
//! ```
// ---------------------------------------------------------------------------
// use
//
use crate::float::FloatCore;
use crate::op::OpCode;
use crate::op::TaylorLayout;
use crate::op::arith;
use crate::op::arith::tc;
use crate::op::unary;
use crate::tape::IndexT;
// ---------------------------------------------------------------------------
//
// forward_pow_vv
pub(crate) fn forward_pow_vv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    arg    : &[IndexT],
    res    : usize,
) {
    let log_arg = [ arg[0] ];
    let mul_arg = [ (res - 2) as IndexT, arg[1] ];
    let exp_arg = [ (res - 1) as IndexT ];
    unary::forward(OpCode::Log, p, q, ell, lay, taylor, &log_arg, res - 2);
    arith::forward_mul_vv(p, q, ell, lay, taylor, &mul_arg, res - 1);
    unary::forward(OpCode::Exp, p, q, ell, lay, taylor, &exp_arg, res);
}
//
// reverse_pow_vv
pub(crate) fn reverse_pow_vv<V : FloatCore>(
    n_ord   : usize,
    lay     : TaylorLayout,
    taylor  : &[V],
    partial : &mut [V],
    arg     : &[IndexT],
    res     : usize,
) {
    let log_arg = [ arg[0] ];
    let mul_arg = [ (res - 2) as IndexT, arg[1] ];
    let exp_arg = [ (res - 1) as IndexT ];
    unary::reverse(OpCode::Exp, n_ord, lay, taylor, partial, &exp_arg, res);
    arith::reverse_mul_vv(n_ord, lay, taylor, partial, &mul_arg, res - 1);
    unary::reverse(OpCode::Log, n_ord, lay, taylor, partial, &log_arg, res - 2);
}
// ---------------------------------------------------------------------------
//
// forward_pow_vp
pub(crate) fn forward_pow_vp<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let e = par[ arg[1] as usize ];
    for k in p ..= q {
        if k == 0 {
            taylor[ lay.at(res, 0, ell) ] = tc(taylor, lay, x, 0, ell).pow(e);
        } else {
            let x0      = tc(taylor, lay, x, 0, ell);
            let mut sum = V::zero();
            for j in 1 ..= k {
                sum += e * V::from_usize(j)
                    * tc(taylor, lay, x, j, ell)
                    * tc(taylor, lay, res, k - j, ell);
            }
            for j in 1 .. k {
                sum -= V::from_usize(j)
                    * tc(taylor, lay, res, j, ell)
                    * tc(taylor, lay, x, k - j, ell);
            }
            taylor[ lay.at(res, k, ell) ] = sum / ( V::from_usize(k) * x0 );
        }
    }
}
//
// reverse_pow_vp
pub(crate) fn reverse_pow_vp<V : FloatCore>(
    n_ord   : usize,
    lay     : TaylorLayout,
    taylor  : &[V],
    partial : &mut [V],
    par     : &[V],
    arg     : &[IndexT],
    res     : usize,
) {
    let x  = arg[0] as usize;
    let e  = par[ arg[1] as usize ];
    let x0 = tc(taylor, lay, x, 0, 0);
    let d  = n_ord - 1;
    for k in (1 ..= d).rev() {
        let pz = partial[res * n_ord + k];
        let t  = pz / ( V::from_usize(k) * x0 );
        partial[x * n_ord] -= pz * tc(taylor, lay, res, k, 0) / x0;
        for j in 1 ..= k {
            let jv = V::from_usize(j);
            partial[x * n_ord + j] +=
                t * e * jv * tc(taylor, lay, res, k - j, 0);
            partial[res * n_ord + (k - j)] +=
                t * e * jv * tc(taylor, lay, x, j, 0);
        }
        for j in 1 .. k {
            let jv = V::from_usize(j);
            partial[res * n_ord + j] -=
                t * jv * tc(taylor, lay, x, k - j, 0);
            partial[x * n_ord + (k - j)] -=
                t * jv * tc(taylor, lay, res, j, 0);
        }
    }
    // z_0 = x_0 ^ e
    partial[x * n_ord] +=
        partial[res * n_ord] * e * x0.pow( e - V::one() );
}
// ---------------------------------------------------------------------------
//
// forward_pow_pv
pub(crate) fn forward_pow_pv<V : FloatCore>(
    p : usize, q : usize, ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    par    : &[V],
    arg    : &[IndexT],
    res    : usize,
) {
    let b = par[ arg[0] as usize ];
    let y = arg[1] as usize;
    for k in p ..= q {
        if k == 0 {
            taylor[ lay.at(res, 0, ell) ] = b.pow( tc(taylor, lay, y, 0, ell) );
        } else {
            let log_b   = b.ln();
            let mut sum = V::zero();
            for j in 1 ..= k {
                sum += V::from_usize(j)
                    * tc(taylor, lay, y, j, ell)
                    * tc(taylor, lay, res, k - j, ell);
            }
            taylor[ lay.at(res, k, ell) ] = log_b * sum / V::from_usize(k);
        }
    }
}
//
// reverse_pow_pv
pub(crate) fn reverse_pow_pv<V : FloatCore>(
    n_ord   : usize,
    lay     : TaylorLayout,
    taylor  : &[V],
    partial : &mut [V],
    par     : &[V],
    arg     : &[IndexT],
    res     : usize,
) {
    let b     = par[ arg[0] as usize ];
    let y     = arg[1] as usize;
    let log_b = b.ln();
    let d     = n_ord - 1;
    for k in (1 ..= d).rev() {
        let pz = partial[res * n_ord + k];
        let kv = V::from_usize(k);
        for j in 1 ..= k {
            let f = log_b * V::from_usize(j) / kv;
            partial[y * n_ord + j]         += pz * f * tc(taylor, lay, res, k - j, 0);
            partial[res * n_ord + (k - j)] += pz * f * tc(taylor, lay, y, j, 0);
        }
    }
    // z_0 = b ^ y_0
    partial[y * n_ord] +=
        partial[res * n_ord] * log_b * tc(taylor, lay, res, 0, 0);
}
