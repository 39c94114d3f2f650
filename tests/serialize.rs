// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Persisted function objects: round trip through the stable byte
// representation.
//
use adtape::{
    ADFun, Error, discrete, register_discrete, start_recording_dyn,
    stop_recording,
};
//
fn round_to_even(x : f64) -> f64 {
    (x / 2.0).round() * 2.0
}
//
#[test]
fn serialize_round_trip() {
    let dis_id = register_discrete::<f64>("round_to_even", round_to_even);
    //
    // f(x; p) = p0 * sin(x0) + x1 / 3 + round_to_even(x1)
    let p = vec![ 2.0f64 ];
    let x = vec![ 0.5f64, 6.0 ];
    let (ap, ax) = start_recording_dyn(p, x).unwrap();
    let ay = vec![
        &( &ap[0] * &ax[0].sin() ) + &( &( &ax[1] / &3f64 )
            + &discrete(dis_id, &ax[1]) ),
    ];
    let f = stop_recording(ay).unwrap();
    //
    let bytes = f.to_bytes().unwrap();
    let mut g : ADFun<f64> = ADFun::from_bytes(&bytes).unwrap();
    assert_eq!( g.domain_len(), 2 );
    assert_eq!( g.range_len(),  1 );
    assert_eq!( g.dyn_ind_len(), 1 );
    //
    let x = vec![ 0.5f64, 6.0 ];
    let check = 2.0 * 0.5f64.sin() + 2.0 + 6.0;
    let y = g.forward(0, x.clone()).unwrap();
    assert!( (y[0] - check).abs() < 1e-14 );
    //
    let dw = g.reverse(0, vec![ 1.0 ]).unwrap();
    assert!( (dw[0] - 2.0 * 0.5f64.cos()).abs() < 1e-14 );
    assert!( (dw[1] - 1.0 / 3.0).abs() < 1e-14 );
    //
    // dynamic parameters replay after deserialization
    g.new_dynamic( vec![ -1.0 ] ).unwrap();
    let y = g.forward(0, x).unwrap();
    assert!( (y[0] - (-(0.5f64.sin()) + 2.0 + 6.0)).abs() < 1e-14 );
}
//
#[test]
fn serialize_rejects_garbage() {
    let result = ADFun::<f64>::from_bytes( &[ 0x17, 0x2a, 0x00 ] );
    match result {
        Err( Error::InvalidData(_) ) => (),
        _ => panic!( "garbage bytes were accepted" ),
    }
}
