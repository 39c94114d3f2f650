// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Checkpoint: an ADFun re-exposed as a single atomic operation inside
// an outer recording.
//
use adtape::{
    Checkpoint, ListPattern, Pattern, call_atomic, start_recording,
    stop_recording,
};
//
#[test]
fn checkpoint_second_order() {
    // inner: g(u) = [ u0 * sin(u1) ]
    let au = start_recording( vec![ 1.0f64, 1.0 ] ).unwrap();
    let ag = vec![ &au[0] * &au[1].sin() ];
    let g  = stop_recording(ag).unwrap();
    let id = Checkpoint::register("chk_u0_sin_u1", g);
    //
    // outer: f(x) = g(x0 + x1, x0)
    let ax = start_recording( vec![ 0.5f64, 0.25 ] ).unwrap();
    let av = vec![ &ax[0] + &ax[1], ax[0] ];
    let ay = call_atomic(id, 0, &av).unwrap();
    let mut f = stop_recording(ay).unwrap();
    //
    // f(x) = (x0 + x1) * sin(x0)
    let x = vec![ 0.5f64, 0.25 ];
    let y = f.forward(0, x.clone()).unwrap();
    assert!( (y[0] - 0.75 * 0.5f64.sin()).abs() < 1e-14 );
    //
    // first order forward and reverse
    let y1 = f.forward(1, vec![ 1.0, 0.0 ]).unwrap();
    let d0 = 0.5f64.sin() + 0.75 * 0.5f64.cos();
    assert!( (y1[0] - d0).abs() < 1e-14 );
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    assert!( (dw[0] - d0).abs() < 1e-14 );
    assert!( (dw[1] - 0.5f64.sin()).abs() < 1e-14 );
    //
    // second order forward through the inner sweeps
    let y2 = f.forward(2, vec![ 0.0, 0.0 ]).unwrap();
    let d2 = 2.0 * 0.5f64.cos() - 0.75 * 0.5f64.sin();
    assert!( (y2[0] - d2 / 2.0).abs() < 1e-14 );
    //
    // sparsity delegates to the inner function
    let mut eye = ListPattern::new(2, 2);
    eye.add_element(0, 0);
    eye.add_element(1, 1);
    let jac = f.for_jac_sparsity(&eye, false, false).unwrap();
    assert_eq!( jac.row(0), vec![0, 1] );
    let hes : ListPattern =
        f.for_hes_sparsity( &[true, true], &[true] ).unwrap();
    assert!( hes.is_element(0, 0) );
    assert!( hes.is_element(0, 1) );
    assert!( hes.is_element(1, 0) );
}
