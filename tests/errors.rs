// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// The error kinds surfaced by the fallible entry points.
//
use std::sync::Arc;
//
use adtape::{
    AD, AdType, Atomic, Error, VecAD, abort_recording, call_atomic,
    register_atomic, start_recording, stop_recording,
};
use adtape::tape::IndexT;
//
#[test]
fn dimension_mismatch() {
    let ax    = start_recording( vec![ 1.0f64, 2.0 ] ).unwrap();
    let ay    = vec![ &ax[0] + &ax[1] ];
    let mut f = stop_recording(ay).unwrap();
    match f.forward(0, vec![ 1.0 ]) {
        Err( Error::DimensionMismatch { expected : 2, found : 1, .. } ) => (),
        _ => panic!( "wrong length was accepted" ),
    }
    f.forward(0, vec![ 1.0, 2.0 ]).unwrap();
    match f.reverse(0, vec![ 1.0, 2.0 ]) {
        Err( Error::DimensionMismatch { expected : 1, found : 2, .. } ) => (),
        _ => panic!( "wrong weight length was accepted" ),
    }
}
//
#[test]
fn recording_protocol() {
    let ax = start_recording( vec![ 1.0f64 ] ).unwrap();
    match start_recording( vec![ 2.0f64 ] ) {
        Err( Error::RecordingAlreadyActive ) => (),
        _ => panic!( "second recording was accepted" ),
    }
    let _ = ax;
    abort_recording::<f64>().unwrap();
    match abort_recording::<f64>() {
        Err( Error::NoActiveRecording ) => (),
        _ => panic!( "abort without a recording was accepted" ),
    }
}
//
#[test]
fn nan_encountered() {
    // log of a negative number is nan from a finite input
    let ax    = start_recording( vec![ 2.0f64 ] ).unwrap();
    let ay    = vec![ ax[0].ln() ];
    let mut f = stop_recording(ay).unwrap();
    //
    // without checking, the nan propagates silently
    let y = f.forward(0, vec![ -1.0 ]).unwrap();
    assert!( y[0].is_nan() );
    //
    f.check_for_nan(true);
    match f.forward(0, vec![ -1.0 ]) {
        Err( Error::NanEncountered { .. } ) => (),
        _ => panic!( "nan from a finite input was not reported" ),
    }
    // the cache is stale: order zero works again at a good point
    assert_eq!( f.forward(0, vec![ 1.0 ]).unwrap(), vec![ 0.0 ] );
}
//
#[test]
fn index_out_of_range() {
    let ax    = start_recording( vec![ 1.0f64 ] ).unwrap();
    let mut v = VecAD::new( vec![ 1.0, 2.0 ] );
    let ay    = vec![ v.load( &ax[0] ) ];
    let mut f = stop_recording(ay).unwrap();
    //
    assert_eq!( f.forward(0, vec![ 1.0 ]).unwrap(), vec![ 2.0 ] );
    match f.forward(0, vec![ 5.0 ]) {
        Err( Error::IndexOutOfRange { index : 5, length : 2 } ) => (),
        _ => panic!( "index outside the vector was accepted" ),
    }
}
//
// ZeroOrderOnly
/// an atomic function that only implements order zero
struct ZeroOrderOnly;
impl Atomic<f64> for ZeroOrderOnly {
    fn name(&self) -> &str {
        "zero_order_only"
    }
    fn n_res(&self) -> usize {
        1
    }
    fn forward(
        &self,
        _call_id  : IndexT,
        _need_y   : &[bool],
        _order_low : usize,
        order_up  : usize,
        _type_x   : &[AdType],
        taylor_x  : &[f64],
        taylor_y  : &mut [f64],
    ) -> bool {
        if order_up > 0 {
            return false;
        }
        taylor_y[0] = 2.0 * taylor_x[0];
        true
    }
}
//
#[test]
fn atomic_order_unsupported() {
    let atom_id = register_atomic::<f64>( Arc::new(ZeroOrderOnly) );
    let ax = start_recording( vec![ 3.0f64 ] ).unwrap();
    let au : Vec< AD<f64> > = vec![ ax[0] ];
    let ay = call_atomic(atom_id, 0, &au).unwrap();
    let mut f = stop_recording(ay).unwrap();
    //
    assert_eq!( f.forward(0, vec![ 3.0 ]).unwrap(), vec![ 6.0 ] );
    match f.forward(1, vec![ 1.0 ]) {
        Err( Error::AtomicOrderUnsupported { order : 1, .. } ) => (),
        _ => panic!( "unsupported order was accepted" ),
    }
    // the reverse callback default also declines
    f.forward(0, vec![ 3.0 ]).unwrap();
    match f.reverse(0, vec![ 1.0 ]) {
        Err( Error::AtomicFailed { .. } ) => (),
        _ => panic!( "missing reverse callback was accepted" ),
    }
}
