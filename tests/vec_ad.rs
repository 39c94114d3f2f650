// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// VecAD: indirect reads and writes with variable indices.
//
use adtape::{VecAD, start_recording, stop_recording};
//
#[test]
fn vecad_indirect_read() {
    // y = v[ floor(x0) ] with v = [ 0, 1, 4, 9 ]
    let x : Vec<f64> = vec![ 2.0 ];
    let ax           = start_recording(x).unwrap();
    let mut av       = VecAD::new( vec![ 0.0, 1.0, 4.0, 9.0 ] );
    let ay           = vec![ av.load( &ax[0] ) ];
    let mut f        = stop_recording(ay).unwrap();
    //
    assert_eq!( f.forward(0, vec![ 2.0 ]).unwrap(), vec![ 4.0 ] );
    // the index is not differentiated
    assert_eq!( f.forward(1, vec![ 1.0 ]).unwrap(), vec![ 0.0 ] );
    //
    // a different index on replay
    assert_eq!( f.forward(0, vec![ 0.2 ]).unwrap(), vec![ 0.0 ] );
    assert_eq!( f.forward(0, vec![ 3.9 ]).unwrap(), vec![ 9.0 ] );
}
//
#[test]
fn vecad_store_variable() {
    // v[1] = x0 * x0, y = v[ floor(x1) ]
    let x : Vec<f64> = vec![ 3.0, 1.5 ];
    let ax           = start_recording(x).unwrap();
    let mut av       = VecAD::new( vec![ 5.0, 5.0 ] );
    let one          = adtape::ad_from_value( 1f64 );
    let asq          = &ax[0] * &ax[0];
    av.store( &one, &asq );
    let ay           = vec![ av.load( &ax[1] ) ];
    let mut f        = stop_recording(ay).unwrap();
    //
    // slot 1 holds the variable x0 * x0
    assert_eq!( f.forward(0, vec![ 3.0, 1.5 ]).unwrap(), vec![ 9.0 ] );
    assert_eq!( f.forward(1, vec![ 1.0, 0.0 ]).unwrap(), vec![ 6.0 ] );
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    assert_eq!( dw, vec![ 6.0, 0.0 ] );
    //
    // slot 0 still holds the initial parameter
    assert_eq!( f.forward(0, vec![ 3.0, 0.5 ]).unwrap(), vec![ 5.0 ] );
    assert_eq!( f.forward(1, vec![ 1.0, 0.0 ]).unwrap(), vec![ 0.0 ] );
}
