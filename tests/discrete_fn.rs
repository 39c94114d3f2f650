// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Discrete functions: value recorded, all derivatives zero.
//
use adtape::{discrete, register_discrete, start_recording, stop_recording};
//
fn floor_f64(x : f64) -> f64 {
    x.floor()
}
//
#[test]
fn discrete_floor() {
    let dis_id = register_discrete::<f64>("discrete_floor", floor_f64);
    //
    let x : Vec<f64> = vec![ 1.7 ];
    let ax           = start_recording(x).unwrap();
    let ay           = vec![ discrete(dis_id, &ax[0]) ];
    let mut f        = stop_recording(ay).unwrap();
    //
    assert_eq!( f.forward(0, vec![ 1.7 ]).unwrap(), vec![ 1.0 ] );
    assert_eq!( f.forward(1, vec![ 1.0 ]).unwrap(), vec![ 0.0 ] );
    assert_eq!( f.reverse(0, vec![ 1.0 ]).unwrap(), vec![ 0.0 ] );
    //
    assert_eq!( f.forward(0, vec![ -0.5 ]).unwrap(), vec![ -1.0 ] );
}
