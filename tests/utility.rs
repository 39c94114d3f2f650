// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// The LU and ODE utilities running on AD scalars inside a recording.
//
use adtape::utility::{lu_solve, runge_45};
use adtape::{AD, start_recording, stop_recording};
//
#[test]
fn lu_solve_recorded() {
    // solve [ x0 1 ; 1 2 ] * u = [ 1 ; 0 ], y = u0 = 2 / (2 x0 - 1)
    let x0 = 2.0f64;
    let ax = start_recording( vec![ x0 ] ).unwrap();
    let aone : AD<f64> = 1f64.into();
    let atwo : AD<f64> = 2f64.into();
    let a = vec![ ax[0], aone, 1f64.into(), atwo ];
    let b : Vec< AD<f64> > = vec![ 1f64.into(), 0f64.into() ];
    let (sign, au) = lu_solve(2, 1, a, b);
    assert_ne!( sign, 0 );
    let mut f = stop_recording( vec![ au[0] ] ).unwrap();
    //
    let y = f.forward(0, vec![ x0 ]).unwrap();
    assert!( (y[0] - 2.0 / (2.0 * x0 - 1.0)).abs() < 1e-12 );
    //
    // d y / d x0 = -4 / (2 x0 - 1)^2
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    let check = -4.0 / ( (2.0 * x0 - 1.0) * (2.0 * x0 - 1.0) );
    assert!( (dw[0] - check).abs() < 1e-12 );
}
//
#[test]
fn runge_45_recorded() {
    // x'(t) = a * x(t), x(0) = 1, integrated to t = 1: x(1) = exp(a)
    let a0 = 1.0f64;
    let aa = start_recording( vec![ a0 ] ).unwrap();
    let a  = aa[0];
    let mut ode = | _t : &AD<f64>, x : &Vec< AD<f64> > | {
        vec![ &a * &x[0] ]
    };
    let (xf, e) = runge_45(
        &mut ode, 8, AD::from(0f64), AD::from(1f64), vec![ AD::from(1f64) ],
    );
    assert!( e[0].to_value().abs() < 1e-4 );
    let mut f = stop_recording( vec![ xf[0] ] ).unwrap();
    //
    let y = f.forward(0, vec![ a0 ]).unwrap();
    assert!( (y[0] - a0.exp()).abs() < 1e-5 );
    //
    // the tape differentiates the integrator: d x(1) / d a = exp(a)
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    assert!( (dw[0] - a0.exp()).abs() < 1e-3 );
}
