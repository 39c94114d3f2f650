// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Dynamic parameters: update without re-recording.
//
use adtape::{cond_exp_ge, start_recording_dyn, stop_recording};
//
#[test]
fn dynamic_replay() {
    // f(x; p) = p0 * x0
    let p : Vec<f64> = vec![ 2.0 ];
    let x : Vec<f64> = vec![ 5.0 ];
    let (ap, ax)     = start_recording_dyn(p, x).unwrap();
    let ay           = vec![ &ap[0] * &ax[0] ];
    let mut f        = stop_recording(ay).unwrap();
    assert_eq!( f.dyn_ind_len(), 1 );
    //
    assert_eq!( f.forward(0, vec![ 5.0 ]).unwrap(), vec![ 10.0 ] );
    //
    f.new_dynamic( vec![ 7.0 ] ).unwrap();
    assert_eq!( f.forward(0, vec![ 5.0 ]).unwrap(), vec![ 35.0 ] );
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    assert_eq!( dw, vec![ 7.0 ] );
}
//
#[test]
fn dynamic_expression() {
    // q = sin(p0), f(x; p) = q * x0: q lives on the dynamic sub tape
    let p : Vec<f64> = vec![ 0.5 ];
    let x : Vec<f64> = vec![ 2.0 ];
    let (ap, ax)     = start_recording_dyn(p, x).unwrap();
    let aq           = ap[0].sin();
    let ay           = vec![ &aq * &ax[0] ];
    let mut f        = stop_recording(ay).unwrap();
    //
    let y = f.forward(0, vec![ 2.0 ]).unwrap();
    assert!( (y[0] - 2.0 * 0.5f64.sin()).abs() < 1e-14 );
    //
    f.new_dynamic( vec![ 1.25 ] ).unwrap();
    let y = f.forward(0, vec![ 2.0 ]).unwrap();
    assert!( (y[0] - 2.0 * 1.25f64.sin()).abs() < 1e-14 );
}
//
#[test]
fn dynamic_cond_exp() {
    // q = max(p0, 1), f(x; p) = q * x0
    let p : Vec<f64> = vec![ 2.0 ];
    let x : Vec<f64> = vec![ 3.0 ];
    let (ap, ax)     = start_recording_dyn(p, x).unwrap();
    let aone         = adtape::ad_from_value( 1f64 );
    let aq           = cond_exp_ge(&ap[0], &aone, &ap[0], &aone);
    let ay           = vec![ &aq * &ax[0] ];
    let mut f        = stop_recording(ay).unwrap();
    //
    assert_eq!( f.forward(0, vec![ 3.0 ]).unwrap(), vec![ 6.0 ] );
    //
    f.new_dynamic( vec![ 0.25 ] ).unwrap();
    assert_eq!( f.forward(0, vec![ 3.0 ]).unwrap(), vec![ 3.0 ] );
}
