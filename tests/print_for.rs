// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// The print operator: a side effect during zero order forward, no value
// and no derivative contribution.
//
use adtape::{print_for, start_recording, stop_recording};
//
#[test]
fn print_for_is_transparent() {
    let ax  = start_recording( vec![ 2.0f64 ] ).unwrap();
    let pos = &ax[0] - &1f64;
    print_for(&pos, "x0 = ", &ax[0], "\n");
    let ay  = vec![ &ax[0] * &ax[0] ];
    let mut f = stop_recording(ay).unwrap();
    //
    // pos > 0: nothing is printed; pos <= 0: the value is printed.
    // either way the results are unaffected.
    assert_eq!( f.forward(0, vec![ 2.0 ]).unwrap(), vec![ 4.0 ] );
    assert_eq!( f.forward(0, vec![ 0.5 ]).unwrap(), vec![ 0.25 ] );
    assert_eq!( f.forward(1, vec![ 1.0 ]).unwrap(), vec![ 1.0 ] );
    assert_eq!( f.reverse(0, vec![ 1.0 ]).unwrap(), vec![ 1.0 ] );
}
