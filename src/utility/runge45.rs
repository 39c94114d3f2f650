// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! Runge-Kutta-Fehlberg 4th and 5th order ODE integrator.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
// use
//
use crate::utility::Scalar;
// ---------------------------------------------------------------------------
//
// runge_45
/// Integrate `x'(t) = f(t, x)` from ti to tf in n_step fixed
/// Fehlberg 4(5) steps.
///
/// * Syntax :
/// ```text
///     (xf, e) = runge_45(&mut f, n_step, ti, tf, xi)
/// ```
///
/// * f :
/// evaluates the right hand side, `f(&t, &x)` .
///
/// * xf :
/// the fourth order accurate approximation for `x(tf)` .
///
/// * e :
/// an element wise estimate of the error in xf, the difference between
/// the fourth and fifth order results.
///
/// # Example
/// x' = x, x(0) = 1 integrates to the exponential:
/// ```
/// use adtape::utility::runge_45;
/// let mut f  = | _t : &f64, x : &Vec<f64> | vec![ x[0] ];
/// let (xf, e) = runge_45(&mut f, 8, 0.0, 1.0, vec![ 1.0 ]);
/// assert!( (xf[0] - 1f64.exp()).abs() < 1e-5 );
/// assert!( e[0].abs() < 1e-4 );
/// ```
pub fn runge_45<S, F>(
    f      : &mut F,
    n_step : usize,
    ti     : S,
    tf     : S,
    xi     : Vec<S>,
) -> ( Vec<S>, Vec<S> )
where
    S : Scalar,
    F : FnMut(&S, &Vec<S>) -> Vec<S>,
{
    assert!( n_step > 0 );
    let n = xi.len();
    //
    // Fehlberg coefficients
    let a : [f64; 6] = [
        0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0,
    ];
    let b : [[f64; 5]; 5] = [
        [ 1.0 / 4.0,       0.0,              0.0,
          0.0,             0.0 ],
        [ 3.0 / 32.0,      9.0 / 32.0,       0.0,
          0.0,             0.0 ],
        [ 1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0,
          0.0,             0.0 ],
        [ 439.0 / 216.0,   -8.0,             3680.0 / 513.0,
          -845.0 / 4104.0, 0.0 ],
        [ -8.0 / 27.0,     2.0,              -3544.0 / 2565.0,
          1859.0 / 4104.0, -11.0 / 40.0 ],
    ];
    let c4 : [f64; 6] = [
        25.0 / 216.0, 0.0, 1408.0 / 2565.0, 2197.0 / 4104.0,
        -1.0 / 5.0, 0.0,
    ];
    let c5 : [f64; 6] = [
        16.0 / 135.0, 0.0, 6656.0 / 12825.0, 28561.0 / 56430.0,
        -9.0 / 50.0, 2.0 / 55.0,
    ];
    //
    let step = ( tf - ti.clone() ) / S::from_f64( n_step as f64 );
    let mut t = ti;
    let mut x = xi;
    let mut e = vec![ S::zero(); n ];
    //
    for _ in 0 .. n_step {
        //
        // the six stages
        let mut k : Vec< Vec<S> > = Vec::with_capacity(6);
        for stage in 0 .. 6 {
            let t_stage = t.clone() + step.clone() * S::from_f64( a[stage] );
            let mut x_stage = x.clone();
            for prev in 0 .. stage {
                let coeff = b[stage - 1][prev];
                if coeff != 0.0 {
                    for j in 0 .. n {
                        x_stage[j] = x_stage[j].clone()
                            + step.clone() * S::from_f64(coeff)
                            * k[prev][j].clone();
                    }
                }
            }
            k.push( f(&t_stage, &x_stage) );
        }
        //
        // fourth and fifth order combinations
        for j in 0 .. n {
            let mut sum4 = S::zero();
            let mut sum5 = S::zero();
            for stage in 0 .. 6 {
                if c4[stage] != 0.0 {
                    sum4 = sum4
                        + S::from_f64( c4[stage] ) * k[stage][j].clone();
                }
                if c5[stage] != 0.0 {
                    sum5 = sum5
                        + S::from_f64( c5[stage] ) * k[stage][j].clone();
                }
            }
            let x4 = x[j].clone() + step.clone() * sum4;
            let x5 = x[j].clone() + step.clone() * sum5;
            e[j]   = e[j].clone() + ( x5 - x4.clone() ).abs_val();
            x[j]   = x4;
        }
        t = t + step.clone();
    }
    (x, e)
}
