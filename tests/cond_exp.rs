// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Conditional expressions: branch selection, compare change counting,
// and reverse mode through the selected branch only.
//
use adtape::{cond_exp_lt, start_recording, stop_recording};
//
#[test]
fn cond_exp_select_and_compare_change() {
    // y = if x0 < x1 { x0 * x0 } else { x1 * x1 }
    let x : Vec<f64> = vec![ 2.0, 3.0 ];
    let ax           = start_recording(x).unwrap();
    let at           = &ax[0] * &ax[0];
    let af           = &ax[1] * &ax[1];
    let ay           = vec![ cond_exp_lt(&ax[0], &ax[1], &at, &af) ];
    let mut f        = stop_recording(ay).unwrap();
    //
    let y0 = f.forward(0, vec![ 2.0, 3.0 ]).unwrap();
    assert_eq!( y0, vec![ 4.0 ] );
    assert_eq!( f.compare_change_count(), 0 );
    //
    // the recorded comparison flips at this argument point
    let y0 = f.forward(0, vec![ 4.0, 3.0 ]).unwrap();
    assert_eq!( y0, vec![ 9.0 ] );
    assert_eq!( f.compare_change_count(), 1 );
}
//
#[test]
fn cond_exp_derivative() {
    let x : Vec<f64> = vec![ 2.0, 3.0 ];
    let ax           = start_recording(x).unwrap();
    let at           = &ax[0] * &ax[0];
    let af           = &ax[1] * &ax[1];
    let ay           = vec![ cond_exp_lt(&ax[0], &ax[1], &at, &af) ];
    let mut f        = stop_recording(ay).unwrap();
    //
    // true branch selected: y = x0 * x0
    f.forward(0, vec![ 2.0, 3.0 ]).unwrap();
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    assert_eq!( dw, vec![ 4.0, 0.0 ] );
    assert_eq!( f.forward(1, vec![ 1.0, 0.0 ]).unwrap(), vec![ 4.0 ] );
    //
    // false branch selected: y = x1 * x1
    f.forward(0, vec![ 4.0, 3.0 ]).unwrap();
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    assert_eq!( dw, vec![ 0.0, 6.0 ] );
    assert_eq!( f.forward(1, vec![ 1.0, 0.0 ]).unwrap(), vec![ 0.0 ] );
}
