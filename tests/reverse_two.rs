// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Second order reverse mode on y = sin(x).
//
use adtape::{start_recording, stop_recording};
//
#[test]
fn reverse_order_two_sin() {
    let x0 = 0.5f64;
    let ax    = start_recording( vec![ x0 ] ).unwrap();
    let ay    = vec![ ax[0].sin() ];
    let mut f = stop_recording(ay).unwrap();
    //
    let y0 = f.forward(0, vec![ x0 ]).unwrap();
    assert!( (y0[0] - x0.sin()).abs() < 1e-14 );
    //
    let y1 = f.forward(1, vec![ 1.0 ]).unwrap();
    assert!( (y1[0] - x0.cos()).abs() < 1e-14 );
    //
    // second order Taylor coefficient is -sin(x0) / 2
    let y2 = f.forward(2, vec![ 0.0 ]).unwrap();
    assert!( (y2[0] + x0.sin() / 2.0).abs() < 1e-14 );
    //
    // weight the second order coefficient of y; the partial with respect
    // to the first order coefficient of x is -sin(x0)
    let dw = f.reverse(2, vec![ 0.0, 0.0, 1.0 ]).unwrap();
    assert_eq!( dw.len(), 3 );
    assert!( (dw[0] + x0.cos() / 2.0).abs() < 1e-14 );
    assert!( (dw[1] + x0.sin()).abs() < 1e-14 );
    assert!( (dw[2] - x0.cos()).abs() < 1e-14 );
}
//
#[test]
fn chain_rule_consistency() {
    // forward one and reverse zero agree on the directional derivative
    let ax    = start_recording( vec![ 1.1f64, 0.7 ] ).unwrap();
    let aprod = &ax[0] * &ax[1];
    let ay    = vec![ aprod.exp() + ax[0].sin() ];
    let mut f = stop_recording(ay).unwrap();
    //
    let x = vec![ 1.1f64, 0.7 ];
    let u = vec![ 0.3f64, -0.2 ];
    f.forward(0, x.clone()).unwrap();
    let forward_der = f.forward(1, u.clone()).unwrap()[0];
    let gradient    = f.reverse(0, vec![ 1.0 ]).unwrap();
    let reverse_der = gradient[0] * u[0] + gradient[1] * u[1];
    assert!( (forward_der - reverse_der).abs() < 1e-12 );
}
