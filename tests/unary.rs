// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Forward and reverse mode, to order two, against closed form first and
// second derivatives, for the unary elementary operators and the power
// and division families.
//
use adtape::{AD, start_recording, stop_recording};
//
// near
fn near(value : f64, check : f64) {
    let tol = 1e-8 * ( 1.0 + check.abs() );
    assert!( (value - check).abs() <= tol,
        "value = {value}, check = {check}"
    );
}
//
// check_order_two
/// Record y = g(x) at x0 and compare with the closed form derivatives
/// d1 = g'(x0), d2 = g''(x0):
///     forward(1, [1])      == d1
///     forward(2, [0])      == d2 / 2
///     reverse(0, [1])      == [d1]          (after forward order 0)
///     reverse(1, [0, 1])   == [d2, d1]      (weight on the order one
///                                            coefficient of y)
fn check_order_two<G>(g : G, x0 : f64, d1 : f64, d2 : f64)
where
    G : Fn(&AD<f64>) -> AD<f64>,
{
    let ax    = start_recording( vec![ x0 ] ).unwrap();
    let ay    = vec![ g(&ax[0]) ];
    let value = ay[0].to_value();
    let mut f = stop_recording(ay).unwrap();
    //
    let y0 = f.forward(0, vec![ x0 ]).unwrap();
    near(y0[0], value);
    //
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    near(dw[0], d1);
    //
    let y1 = f.forward(1, vec![ 1.0 ]).unwrap();
    near(y1[0], d1);
    //
    let y2 = f.forward(2, vec![ 0.0 ]).unwrap();
    near(y2[0], d2 / 2.0);
    //
    let dw = f.reverse(1, vec![ 0.0, 1.0 ]).unwrap();
    near(dw[0], d2);
    near(dw[1], d1);
}
// ---------------------------------------------------------------------------
#[test]
fn sqrt_exp_log() {
    let x = 2.25f64;
    check_order_two(
        |ax| ax.sqrt(), x,
        0.5 / x.sqrt(),
        -0.25 / ( x * x.sqrt() ),
    );
    let x = 0.3f64;
    check_order_two( |ax| ax.exp(),    x, x.exp(), x.exp() );
    check_order_two( |ax| ax.exp_m1(), x, x.exp(), x.exp() );
    let x = 1.7f64;
    check_order_two( |ax| ax.ln(), x, 1.0 / x, -1.0 / (x * x) );
    let x = 0.7f64;
    check_order_two(
        |ax| ax.ln_1p(), x,
        1.0 / (1.0 + x),
        -1.0 / ( (1.0 + x) * (1.0 + x) ),
    );
}
//
#[test]
fn circular() {
    let x = 0.5f64;
    check_order_two( |ax| ax.sin(), x, x.cos(), -x.sin() );
    check_order_two( |ax| ax.cos(), x, -x.sin(), -x.cos() );
    let x = 0.4f64;
    let sec2 = 1.0 + x.tan() * x.tan();
    check_order_two( |ax| ax.tan(), x, sec2, 2.0 * x.tan() * sec2 );
}
//
#[test]
fn hyperbolic() {
    let x = 0.6f64;
    check_order_two( |ax| ax.sinh(), x, x.cosh(), x.sinh() );
    check_order_two( |ax| ax.cosh(), x, x.sinh(), x.cosh() );
    let t    = x.tanh();
    let sech2 = 1.0 - t * t;
    check_order_two( |ax| ax.tanh(), x, sech2, -2.0 * t * sech2 );
}
//
#[test]
fn inverse_circular() {
    let x = 0.4f64;
    let b = (1.0 - x * x).sqrt();
    check_order_two( |ax| ax.asin(), x, 1.0 / b, x / (b * b * b) );
    check_order_two( |ax| ax.acos(), x, -1.0 / b, -x / (b * b * b) );
    let x = 0.8f64;
    let w = 1.0 + x * x;
    check_order_two( |ax| ax.atan(), x, 1.0 / w, -2.0 * x / (w * w) );
}
//
#[test]
fn inverse_hyperbolic() {
    let x = 0.8f64;
    let b = (1.0 + x * x).sqrt();
    check_order_two( |ax| ax.asinh(), x, 1.0 / b, -x / (b * b * b) );
    let x = 1.5f64;
    let b = (x * x - 1.0).sqrt();
    check_order_two( |ax| ax.acosh(), x, 1.0 / b, -x / (b * b * b) );
    let x = 0.3f64;
    let w = 1.0 - x * x;
    check_order_two( |ax| ax.atanh(), x, 1.0 / w, 2.0 * x / (w * w) );
}
//
#[test]
fn error_function() {
    let x = 0.5f64;
    let c = 2.0 / std::f64::consts::PI.sqrt();
    let w = c * (-x * x).exp();
    check_order_two( |ax| ax.erf(),  x, w, -2.0 * x * w );
    check_order_two( |ax| ax.erfc(), x, -w, 2.0 * x * w );
}
//
#[test]
fn piecewise() {
    check_order_two( |ax| ax.abs(), -1.5, -1.0, 0.0 );
    check_order_two( |ax| ax.abs(), 1.5, 1.0, 0.0 );
    check_order_two( |ax| -ax, 1.5, -1.0, 0.0 );
    check_order_two( |ax| ax.signum(), 1.5, 0.0, 0.0 );
}
//
#[test]
fn power() {
    // variable to a parameter power
    let x = 2.0f64;
    check_order_two(
        |ax| ax.pow( &adtape::ad_from_value(3f64) ), x,
        3.0 * x * x,
        6.0 * x,
    );
    // parameter to a variable power
    let x = 1.5f64;
    let log2 = 2f64.ln();
    check_order_two(
        |ax| adtape::ad_from_value(2f64).pow(ax), x,
        log2 * 2f64.powf(x),
        log2 * log2 * 2f64.powf(x),
    );
}
//
#[test]
fn power_vv() {
    // z = x0 ^ x1 at (2, 1.5)
    let x0 = 2.0f64;
    let x1 = 1.5f64;
    let ax    = start_recording( vec![ x0, x1 ] ).unwrap();
    let ay    = vec![ ax[0].pow( &ax[1] ) ];
    let mut f = stop_recording(ay).unwrap();
    //
    let y = f.forward(0, vec![ x0, x1 ]).unwrap();
    near( y[0], x0.powf(x1) );
    //
    let jac = f.jacobian( vec![ x0, x1 ] ).unwrap();
    near( jac[0], x1 * x0.powf(x1 - 1.0) );
    near( jac[1], x0.ln() * x0.powf(x1) );
    //
    let hes = f.hessian( vec![ x0, x1 ], vec![ 1.0 ] ).unwrap();
    near( hes[0], x1 * (x1 - 1.0) * x0.powf(x1 - 2.0) );
    let cross = x0.powf(x1 - 1.0) * ( 1.0 + x1 * x0.ln() );
    near( hes[1], cross );
    near( hes[2], cross );
    near( hes[3], x0.ln() * x0.ln() * x0.powf(x1) );
}
//
#[test]
fn division() {
    // parameter / variable
    let x = 1.6f64;
    check_order_two(
        |ax| &adtape::ad_from_value(2f64) / ax, x,
        -2.0 / (x * x),
        4.0 / (x * x * x),
    );
    // variable / parameter
    check_order_two(
        |ax| ax / &4f64, x,
        0.25,
        0.0,
    );
    // variable / variable via the Jacobian
    let ax    = start_recording( vec![ 3f64, 2f64 ] ).unwrap();
    let ay    = vec![ &ax[0] / &ax[1] ];
    let mut f = stop_recording(ay).unwrap();
    let jac   = f.jacobian( vec![ 3.0, 2.0 ] ).unwrap();
    near( jac[0], 0.5 );
    near( jac[1], -0.75 );
    let hes = f.hessian( vec![ 3.0, 2.0 ], vec![ 1.0 ] ).unwrap();
    near( hes[0], 0.0 );
    near( hes[1], -0.25 );
    near( hes[2], -0.25 );
    near( hes[3], 0.75 );
}
//
#[test]
fn absorbing_multiplication() {
    // azmul records its own operator family with the usual derivatives
    let ax    = start_recording( vec![ 3f64, 5f64 ] ).unwrap();
    let ay    = vec![ ax[0].azmul( &ax[1] ) ];
    let mut f = stop_recording(ay).unwrap();
    assert_eq!( f.forward(0, vec![ 3.0, 5.0 ]).unwrap(), vec![ 15.0 ] );
    assert_eq!( f.reverse(0, vec![ 1.0 ]).unwrap(), vec![ 5.0, 3.0 ] );
    //
    // an absorbing zero on the left kills a nan on the right
    let ax    = start_recording( vec![ 5f64 ] ).unwrap();
    let azero = adtape::ad_from_value( 0f64 );
    let anan  = &adtape::ad_from_value( f64::NAN ) / &ax[0];
    let ay    = vec![ azero.azmul( &anan ) ];
    let mut f = stop_recording(ay).unwrap();
    assert_eq!( f.forward(0, vec![ 0.0 ]).unwrap(), vec![ 0.0 ] );
}
