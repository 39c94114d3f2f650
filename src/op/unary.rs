// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Taylor coefficient kernels for the unary elementary operators.
//!
//! Link to [parent module](super)
//!
//! Operators whose derivative needs a companion value store it as an
//! auxiliary result variable at index `res - 1` , just before the primary
//! result:
//!
//! | primary          | auxiliary                 |
//! | ---------------- | ------------------------- |
//! | sin, cos         | cos, sin                  |
//! | sinh, cosh       | cosh, sinh                |
//! | tan, tanh        | primary squared           |
//! | asin, acos       | sqrt(1 - x*x)             |
//! | asinh            | sqrt(1 + x*x)             |
//! | acosh            | sqrt(x*x - 1)             |
//! | atan             | 1 + x*x                   |
//! | atanh            | 1 - x*x                   |
//! | erf, erfc        | (2/sqrt(pi)) * exp(-x*x)  |
//!
//! The reverse kernels are the mechanical adjoints of the forward
//! recurrences, walked from order `n_ord - 1` down to order zero.
// ---------------------------------------------------------------------------
// use
//
use crate::float::FloatCore;
use crate::op::OpCode;
use crate::op::TaylorLayout;
use crate::op::arith::tc;
use crate::tape::IndexT;
// ---------------------------------------------------------------------------
// 2 / sqrt(pi), the erf derivative constant
const TWO_OVER_SQRT_PI : f64 = 1.1283791670955126;
// ---------------------------------------------------------------------------
// forward
/// Forward kernel for every unary operator: compute coefficient orders
/// `p ..= q` of the result (and its auxiliary) for direction `ell` .
pub(crate) fn forward<V : FloatCore>(
    op  : OpCode,
    p   : usize,
    q   : usize,
    ell : usize,
    lay    : TaylorLayout,
    taylor : &mut [V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    //
    // coefficient access
    macro_rules! get { ($var:expr, $k:expr) => {
        tc(taylor, lay, $var, $k, ell)
    } }
    macro_rules! set { ($var:expr, $k:expr, $value:expr) => {
        { let v = $value; taylor[ lay.at($var, $k, ell) ] = v; }
    } }
    //
    match op {
        //
        OpCode::Abs => {
            let s = get!(x, 0).signum();
            for k in p ..= q {
                set!(res, k, s * get!(x, k));
            }
        }
        OpCode::Neg => {
            for k in p ..= q {
                set!(res, k, -get!(x, k));
            }
        }
        OpCode::Sign => {
            for k in p ..= q {
                let zk = if k == 0 {
                    get!(x, 0).signum()
                } else {
                    V::zero()
                };
                set!(res, k, zk);
            }
        }
        OpCode::Sqrt => {
            for k in p ..= q {
                if k == 0 {
                    set!(res, 0, get!(x, 0).sqrt());
                } else {
                    let z0     = get!(res, 0);
                    let mut nk = get!(x, k);
                    for j in 1 .. k {
                        nk -= get!(res, j) * get!(res, k - j);
                    }
                    set!(res, k, nk / (z0 + z0));
                }
            }
        }
        OpCode::Exp | OpCode::Expm1 => {
            // zp is z for exp and z + 1 for expm1
            let shift = if op == OpCode::Expm1 { V::one() } else { V::zero() };
            for k in p ..= q {
                if k == 0 {
                    let z0 = if op == OpCode::Expm1 {
                        get!(x, 0).exp_m1()
                    } else {
                        get!(x, 0).exp()
                    };
                    set!(res, 0, z0);
                } else {
                    let mut sum = V::zero();
                    for j in 1 ..= k {
                        let mut zp = get!(res, k - j);
                        if k == j {
                            zp += shift;
                        }
                        sum += V::from_usize(j) * get!(x, j) * zp;
                    }
                    set!(res, k, sum / V::from_usize(k));
                }
            }
        }
        OpCode::Log | OpCode::Log1p => {
            // d0 is x_0 for log and 1 + x_0 for log1p
            let shift = if op == OpCode::Log1p { V::one() } else { V::zero() };
            for k in p ..= q {
                if k == 0 {
                    let z0 = if op == OpCode::Log1p {
                        get!(x, 0).ln_1p()
                    } else {
                        get!(x, 0).ln()
                    };
                    set!(res, 0, z0);
                } else {
                    let d0      = shift + get!(x, 0);
                    let mut sum = V::zero();
                    for j in 1 .. k {
                        sum += V::from_usize(j) * get!(res, j)
                            * get!(x, k - j);
                    }
                    let nk = get!(x, k) - sum / V::from_usize(k);
                    set!(res, k, nk / d0);
                }
            }
        }
        OpCode::Sin | OpCode::Cos | OpCode::Sinh | OpCode::Cosh => {
            // s is the odd and c the even companion; flip is the sign in
            // the circular derivative of the even companion
            let (s, c) = match op {
                OpCode::Sin | OpCode::Sinh => (res, res - 1),
                _                          => (res - 1, res),
            };
            let hyper = matches!(op, OpCode::Sinh | OpCode::Cosh);
            for k in p ..= q {
                if k == 0 {
                    if hyper {
                        set!(s, 0, get!(x, 0).sinh());
                        set!(c, 0, get!(x, 0).cosh());
                    } else {
                        set!(s, 0, get!(x, 0).sin());
                        set!(c, 0, get!(x, 0).cos());
                    }
                } else {
                    let mut sum_s = V::zero();
                    let mut sum_c = V::zero();
                    for j in 1 ..= k {
                        let jx = V::from_usize(j) * get!(x, j);
                        sum_s += jx * get!(c, k - j);
                        sum_c += jx * get!(s, k - j);
                    }
                    let kv = V::from_usize(k);
                    set!(s, k, sum_s / kv);
                    if hyper {
                        set!(c, k, sum_c / kv);
                    } else {
                        set!(c, k, -sum_c / kv);
                    }
                }
            }
        }
        OpCode::Tan | OpCode::Tanh => {
            // aux is the primary squared
            let aux  = res - 1;
            let flip = op == OpCode::Tanh;
            for k in p ..= q {
                if k == 0 {
                    let z0 = if flip {
                        get!(x, 0).tanh()
                    } else {
                        get!(x, 0).tan()
                    };
                    set!(res, 0, z0);
                    set!(aux, 0, z0 * z0);
                } else {
                    let mut sum = V::zero();
                    for j in 1 ..= k {
                        sum += V::from_usize(j) * get!(x, j)
                            * get!(aux, k - j);
                    }
                    sum = sum / V::from_usize(k);
                    let zk = if flip {
                        get!(x, k) - sum
                    } else {
                        get!(x, k) + sum
                    };
                    set!(res, k, zk);
                    let mut yk = V::zero();
                    for i in 0 ..= k {
                        yk += get!(res, i) * get!(res, k - i);
                    }
                    set!(aux, k, yk);
                }
            }
        }
        OpCode::Asin | OpCode::Acos | OpCode::Asinh | OpCode::Acosh => {
            // aux b with b*b = 1 - x*x, 1 + x*x, or x*x - 1
            let b = res - 1;
            for k in p ..= q {
                if k == 0 {
                    let x0 = get!(x, 0);
                    let (b0, z0) = match op {
                        OpCode::Asin  =>
                            ((V::one() - x0 * x0).sqrt(), x0.asin()),
                        OpCode::Acos  =>
                            ((V::one() - x0 * x0).sqrt(), x0.acos()),
                        OpCode::Asinh =>
                            ((V::one() + x0 * x0).sqrt(), x0.asinh()),
                        _             =>
                            ((x0 * x0 - V::one()).sqrt(), x0.acosh()),
                    };
                    set!(b, 0, b0);
                    set!(res, 0, z0);
                } else {
                    // u_k is the order k coefficient of b*b
                    let mut uk = V::zero();
                    for j in 0 ..= k {
                        uk += get!(x, j) * get!(x, k - j);
                    }
                    if matches!(op, OpCode::Asin | OpCode::Acos) {
                        uk = -uk;
                    }
                    let b0     = get!(b, 0);
                    let mut nb = uk;
                    for j in 1 .. k {
                        nb -= get!(b, j) * get!(b, k - j);
                    }
                    set!(b, k, nb / (b0 + b0));
                    //
                    let mut sum = V::zero();
                    for j in 1 .. k {
                        sum += V::from_usize(j) * get!(res, j)
                            * get!(b, k - j);
                    }
                    sum = sum / V::from_usize(k);
                    let zk = if op == OpCode::Acos {
                        -(get!(x, k) + sum) / b0
                    } else {
                        (get!(x, k) - sum) / b0
                    };
                    set!(res, k, zk);
                }
            }
        }
        OpCode::Atan | OpCode::Atanh => {
            // aux w = 1 + x*x for atan and 1 - x*x for atanh
            let w    = res - 1;
            let flip = op == OpCode::Atanh;
            for k in p ..= q {
                if k == 0 {
                    let x0 = get!(x, 0);
                    if flip {
                        set!(w, 0, V::one() - x0 * x0);
                        set!(res, 0, x0.atanh());
                    } else {
                        set!(w, 0, V::one() + x0 * x0);
                        set!(res, 0, x0.atan());
                    }
                } else {
                    let mut wk = V::zero();
                    for j in 0 ..= k {
                        wk += get!(x, j) * get!(x, k - j);
                    }
                    if flip {
                        wk = -wk;
                    }
                    set!(w, k, wk);
                    //
                    let w0      = get!(w, 0);
                    let mut sum = V::zero();
                    for j in 1 .. k {
                        sum += V::from_usize(j) * get!(res, j)
                            * get!(w, k - j);
                    }
                    sum = sum / V::from_usize(k);
                    set!(res, k, (get!(x, k) - sum) / w0);
                }
            }
        }
        OpCode::Erf | OpCode::Erfc => {
            // aux w = (2/sqrt(pi)) * exp(-x*x), the erf derivative
            let w    = res - 1;
            let flip = op == OpCode::Erfc;
            let c    = V::from_f64( TWO_OVER_SQRT_PI );
            for k in p ..= q {
                if k == 0 {
                    let x0 = get!(x, 0);
                    set!(w, 0, c * (-(x0 * x0)).exp());
                    let z0 = if flip { x0.erfc() } else { x0.erf() };
                    set!(res, 0, z0);
                } else {
                    // w follows the exp recurrence with u = -x*x
                    let mut sum_w = V::zero();
                    for j in 1 ..= k {
                        let mut uj = V::zero();
                        for i in 0 ..= j {
                            uj += get!(x, i) * get!(x, j - i);
                        }
                        sum_w -= V::from_usize(j) * uj * get!(w, k - j);
                    }
                    set!(w, k, sum_w / V::from_usize(k));
                    //
                    let mut sum_z = V::zero();
                    for j in 1 ..= k {
                        sum_z += V::from_usize(j) * get!(x, j)
                            * get!(w, k - j);
                    }
                    sum_z = sum_z / V::from_usize(k);
                    set!(res, k, if flip { -sum_z } else { sum_z });
                }
            }
        }
        _ => panic!( "unary forward: {op:?} is not a unary operator" ),
    }
}
// ---------------------------------------------------------------------------
// reverse
/// Reverse kernel for every unary operator: accumulate the adjoint of the
/// forward recurrences into `partial` (indexed `var * n_ord + k`).
pub(crate) fn reverse<V : FloatCore>(
    op     : OpCode,
    n_ord  : usize,
    lay    : TaylorLayout,
    taylor : &[V],
    partial : &mut [V],
    arg    : &[IndexT],
    res    : usize,
) {
    let x = arg[0] as usize;
    let d = n_ord - 1;
    //
    macro_rules! get { ($var:expr, $k:expr) => {
        tc(taylor, lay, $var, $k, 0)
    } }
    macro_rules! pa { ($var:expr, $k:expr) => {
        partial[ $var * n_ord + $k ]
    } }
    //
    match op {
        //
        OpCode::Abs => {
            let s = get!(x, 0).signum();
            for k in 0 .. n_ord {
                let pz = pa!(res, k);
                pa!(x, k) += s * pz;
            }
        }
        OpCode::Neg => {
            for k in 0 .. n_ord {
                let pz = pa!(res, k);
                pa!(x, k) -= pz;
            }
        }
        OpCode::Sign => (),
        OpCode::Sqrt => {
            let z0 = get!(res, 0);
            for k in (1 ..= d).rev() {
                let t = pa!(res, k) / (z0 + z0);
                pa!(x, k)   += t;
                pa!(res, 0) -= (t + t) * get!(res, k);
                for j in 1 .. k {
                    pa!(res, j) -= (t + t) * get!(res, k - j);
                }
            }
            pa!(x, 0) += pa!(res, 0) / (z0 + z0);
        }
        OpCode::Exp | OpCode::Expm1 => {
            let shift = if op == OpCode::Expm1 { V::one() } else { V::zero() };
            for k in (1 ..= d).rev() {
                let pz = pa!(res, k);
                let kv = V::from_usize(k);
                for j in 1 ..= k {
                    let f      = V::from_usize(j) / kv;
                    let mut zp = get!(res, k - j);
                    if k == j {
                        zp += shift;
                    }
                    pa!(x, j)       += pz * f * zp;
                    pa!(res, k - j) += pz * f * get!(x, j);
                }
            }
            pa!(x, 0) += pa!(res, 0) * (get!(res, 0) + shift);
        }
        OpCode::Log | OpCode::Log1p => {
            let shift = if op == OpCode::Log1p { V::one() } else { V::zero() };
            let d0    = shift + get!(x, 0);
            for k in (1 ..= d).rev() {
                let t  = pa!(res, k) / d0;
                let kv = V::from_usize(k);
                pa!(x, k) += t;
                pa!(x, 0) -= t * get!(res, k);
                for j in 1 .. k {
                    let f = V::from_usize(j) / kv;
                    pa!(res, j)   -= t * f * get!(x, k - j);
                    pa!(x, k - j) -= t * f * get!(res, j);
                }
            }
            pa!(x, 0) += pa!(res, 0) / d0;
        }
        OpCode::Sin | OpCode::Cos | OpCode::Sinh | OpCode::Cosh => {
            let (s, c) = match op {
                OpCode::Sin | OpCode::Sinh => (res, res - 1),
                _                          => (res - 1, res),
            };
            let hyper = matches!(op, OpCode::Sinh | OpCode::Cosh);
            for k in (1 ..= d).rev() {
                let ps = pa!(s, k);
                let pc = pa!(c, k);
                let kv = V::from_usize(k);
                for j in 1 ..= k {
                    let f  = V::from_usize(j) / kv;
                    let xj = get!(x, j);
                    // adjoint of s_k = (1/k) sum j x_j c_{k-j}
                    pa!(x, j)     += ps * f * get!(c, k - j);
                    pa!(c, k - j) += ps * f * xj;
                    // adjoint of c_k = +-(1/k) sum j x_j s_{k-j}
                    if hyper {
                        pa!(x, j)     += pc * f * get!(s, k - j);
                        pa!(s, k - j) += pc * f * xj;
                    } else {
                        pa!(x, j)     -= pc * f * get!(s, k - j);
                        pa!(s, k - j) -= pc * f * xj;
                    }
                }
            }
            if hyper {
                pa!(x, 0) += pa!(s, 0) * get!(c, 0) + pa!(c, 0) * get!(s, 0);
            } else {
                pa!(x, 0) += pa!(s, 0) * get!(c, 0) - pa!(c, 0) * get!(s, 0);
            }
        }
        OpCode::Tan | OpCode::Tanh => {
            let aux  = res - 1;
            let flip = op == OpCode::Tanh;
            for k in (1 ..= d).rev() {
                // adjoint of y_k = sum_i z_i z_{k-i}
                let py = pa!(aux, k);
                for i in 0 ..= k {
                    pa!(res, i)     += py * get!(res, k - i);
                    pa!(res, k - i) += py * get!(res, i);
                }
                // adjoint of z_k = x_k +- (1/k) sum j x_j y_{k-j}
                let pz = pa!(res, k);
                let kv = V::from_usize(k);
                pa!(x, k) += pz;
                for j in 1 ..= k {
                    let f = V::from_usize(j) / kv;
                    if flip {
                        pa!(x, j)       -= pz * f * get!(aux, k - j);
                        pa!(aux, k - j) -= pz * f * get!(x, j);
                    } else {
                        pa!(x, j)       += pz * f * get!(aux, k - j);
                        pa!(aux, k - j) += pz * f * get!(x, j);
                    }
                }
            }
            // y_0 = z_0 * z_0 then z_0 = tan(x_0) or tanh(x_0)
            let py0 = pa!(aux, 0);
            pa!(res, 0) += (py0 + py0) * get!(res, 0);
            let w = if flip {
                V::one() - get!(aux, 0)
            } else {
                V::one() + get!(aux, 0)
            };
            pa!(x, 0) += pa!(res, 0) * w;
        }
        OpCode::Asin | OpCode::Acos | OpCode::Asinh | OpCode::Acosh => {
            let b    = res - 1;
            let b0   = get!(b, 0);
            let acos = op == OpCode::Acos;
            let circular = matches!(op, OpCode::Asin | OpCode::Acos);
            for k in (1 ..= d).rev() {
                // adjoint of z_k
                let t  = pa!(res, k) / b0;
                let kv = V::from_usize(k);
                if acos {
                    pa!(x, k) -= t;
                } else {
                    pa!(x, k) += t;
                }
                pa!(b, 0) -= t * get!(res, k);
                for j in 1 .. k {
                    let f = V::from_usize(j) / kv;
                    pa!(res, j)   -= t * f * get!(b, k - j);
                    pa!(b, k - j) -= t * f * get!(res, j);
                }
                // adjoint of b_k = (u_k - sum b_j b_{k-j}) / (2 b_0)
                let s = pa!(b, k) / (b0 + b0);
                pa!(b, 0) -= (s + s) * get!(b, k);
                for j in 1 .. k {
                    pa!(b, j)     -= s * get!(b, k - j);
                    pa!(b, k - j) -= s * get!(b, j);
                }
                // adjoint of u_k = -+ sum x_j x_{k-j}
                for j in 0 ..= k {
                    if circular {
                        pa!(x, j)     -= s * get!(x, k - j);
                        pa!(x, k - j) -= s * get!(x, j);
                    } else {
                        pa!(x, j)     += s * get!(x, k - j);
                        pa!(x, k - j) += s * get!(x, j);
                    }
                }
            }
            // order zero
            if acos {
                pa!(x, 0) -= pa!(res, 0) / b0;
            } else {
                pa!(x, 0) += pa!(res, 0) / b0;
            }
            if circular {
                pa!(x, 0) -= pa!(b, 0) * get!(x, 0) / b0;
            } else {
                pa!(x, 0) += pa!(b, 0) * get!(x, 0) / b0;
            }
        }
        OpCode::Atan | OpCode::Atanh => {
            let w    = res - 1;
            let w0   = get!(w, 0);
            let flip = op == OpCode::Atanh;
            for k in (1 ..= d).rev() {
                // adjoint of z_k
                let t  = pa!(res, k) / w0;
                let kv = V::from_usize(k);
                pa!(x, k) += t;
                pa!(w, 0) -= t * get!(res, k);
                for j in 1 .. k {
                    let f = V::from_usize(j) / kv;
                    pa!(res, j)   -= t * f * get!(w, k - j);
                    pa!(w, k - j) -= t * f * get!(res, j);
                }
                // adjoint of w_k = -+ sum x_j x_{k-j}
                let pw = pa!(w, k);
                for j in 0 ..= k {
                    if flip {
                        pa!(x, j)     -= pw * get!(x, k - j);
                        pa!(x, k - j) -= pw * get!(x, j);
                    } else {
                        pa!(x, j)     += pw * get!(x, k - j);
                        pa!(x, k - j) += pw * get!(x, j);
                    }
                }
            }
            // order zero
            pa!(x, 0) += pa!(res, 0) / w0;
            let pw0 = pa!(w, 0);
            let x0  = get!(x, 0);
            if flip {
                pa!(x, 0) -= (pw0 + pw0) * x0;
            } else {
                pa!(x, 0) += (pw0 + pw0) * x0;
            }
        }
        OpCode::Erf | OpCode::Erfc => {
            let w    = res - 1;
            let flip = op == OpCode::Erfc;
            for k in (1 ..= d).rev() {
                // adjoint of z_k = +-(1/k) sum j x_j w_{k-j}
                let pz = pa!(res, k);
                let kv = V::from_usize(k);
                for j in 1 ..= k {
                    let f = V::from_usize(j) / kv;
                    if flip {
                        pa!(x, j)     -= pz * f * get!(w, k - j);
                        pa!(w, k - j) -= pz * f * get!(x, j);
                    } else {
                        pa!(x, j)     += pz * f * get!(w, k - j);
                        pa!(w, k - j) += pz * f * get!(x, j);
                    }
                }
                // adjoint of w_k = -(1/k) sum j u_j w_{k-j},
                // u_j = sum x_i x_{j-i}
                let pw = pa!(w, k);
                for j in 1 ..= k {
                    let f  = V::from_usize(j) / kv;
                    let mut uj = V::zero();
                    for i in 0 ..= j {
                        uj += get!(x, i) * get!(x, j - i);
                    }
                    pa!(w, k - j) -= pw * f * uj;
                    let t = pw * f * get!(w, k - j);
                    for i in 0 ..= j {
                        pa!(x, i)     -= t * get!(x, j - i);
                        pa!(x, j - i) -= t * get!(x, i);
                    }
                }
            }
            // order zero
            let w0 = get!(w, 0);
            if flip {
                pa!(x, 0) -= pa!(res, 0) * w0;
            } else {
                pa!(x, 0) += pa!(res, 0) * w0;
            }
            let pw0 = pa!(w, 0);
            let x0  = get!(x, 0);
            pa!(x, 0) -= (pw0 + pw0) * w0 * x0;
        }
        _ => panic!( "unary reverse: {op:?} is not a unary operator" ),
    }
}
