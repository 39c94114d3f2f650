// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Optimizer: dead code, common subexpressions, cumulative summation,
// conditional skips, and the recording time simplifications. Optimized
// tapes produce the same values and coefficients at every order.
//
use adtape::{ADFun, cond_exp_lt, start_recording, stop_recording};
//
// check_same
/// forward orders 0..2 and reverse order 1 agree for two functions
fn check_same(f : &mut ADFun<f64>, g : &mut ADFun<f64>, x : Vec<f64>) {
    let n  = f.domain_len();
    let m  = f.range_len();
    let y0_f = f.forward(0, x.clone()).unwrap();
    let y0_g = g.forward(0, x.clone()).unwrap();
    assert_eq!( y0_f, y0_g );
    //
    let dx : Vec<f64> = (0 .. n).map( |j| 1.0 + j as f64 ).collect();
    let y1_f = f.forward(1, dx.clone()).unwrap();
    let y1_g = g.forward(1, dx).unwrap();
    assert_eq!( y1_f, y1_g );
    //
    let y2_f = f.forward(2, vec![ 0.0; n ]).unwrap();
    let y2_g = g.forward(2, vec![ 0.0; n ]).unwrap();
    assert_eq!( y2_f, y2_g );
    //
    let w : Vec<f64> = (0 .. 2 * m).map( |i| (i % 3) as f64 ).collect();
    let dw_f = f.reverse(1, w.clone()).unwrap();
    let dw_g = g.reverse(1, w).unwrap();
    assert_eq!( dw_f, dw_g );
}
//
#[test]
fn common_subexpression() {
    let record = | | {
        let ax = start_recording( vec![ 1.0f64, 2.0 ] ).unwrap();
        let au = &ax[0] * &ax[1];
        let av = &ax[0] * &ax[1];
        let aw = au.sin();
        let az = av.sin();
        stop_recording( vec![ &aw + &az ] ).unwrap()
    };
    let mut f = record();
    let mut g = record();
    g.optimize();
    // one multiply and one sine survive
    assert!( g.size_op() < f.size_op() );
    check_same(&mut f, &mut g, vec![ 0.25, 3.0 ]);
}
//
#[test]
fn dead_code() {
    let record = | | {
        let ax     = start_recording( vec![ 2.0f64 ] ).unwrap();
        let _dead  = ax[0].exp().sqrt();
        stop_recording( vec![ ax[0].sin() ] ).unwrap()
    };
    let mut f = record();
    let mut g = record();
    g.optimize();
    assert!( g.size_var() < f.size_var() );
    check_same(&mut f, &mut g, vec![ 0.5 ]);
}
//
#[test]
fn cumulative_sum() {
    let record = | | {
        let ax = start_recording( vec![ 1.0f64, 2.0, 3.0, 4.0 ] ).unwrap();
        let s  = &( &( &ax[0] + &ax[1] ) + &ax[2] ) - &ax[3];
        stop_recording( vec![ s + 5f64 ] ).unwrap()
    };
    let mut f = record();
    let mut g = record();
    g.optimize();
    // the addition chain folds into one cumulative summation
    assert!( g.size_op() < f.size_op() );
    check_same(&mut f, &mut g, vec![ 1.5, -2.0, 8.0, 0.25 ]);
    assert_eq!( g.forward(0, vec![ 1.0, 1.0, 1.0, 1.0 ]).unwrap(),
        vec![ 7.0 ] );
    let dw = g.reverse(0, vec![ 1.0 ]).unwrap();
    assert_eq!( dw, vec![ 1.0, 1.0, 1.0, -1.0 ] );
}
//
#[test]
fn conditional_skip() {
    let record = | | {
        let ax = start_recording( vec![ 1.0f64, 2.0 ] ).unwrap();
        let at = ax[0].exp().sin();
        let af = ax[1].ln().cos();
        let az = cond_exp_lt(&ax[0], &ax[1], &at, &af);
        stop_recording( vec![ az ] ).unwrap()
    };
    let mut f = record();
    let mut g = record();
    g.optimize();
    // both branch directions still agree after optimization
    check_same(&mut f, &mut g, vec![ 0.5, 2.0 ]);
    check_same(&mut f, &mut g, vec![ 3.0, 2.0 ]);
    assert_eq!( f.compare_change_count(), g.compare_change_count() );
}
//
#[test]
fn recording_simplifications() {
    // multiplying by an identical one and adding an identical zero do
    // not grow the tape
    let ax = start_recording( vec![ 3.0f64 ] ).unwrap();
    let ay = &( &ax[0] * &1f64 ) + &0f64;
    let mut f = stop_recording( vec![ ay ] ).unwrap();
    // variable zero plus the single independent variable
    assert_eq!( f.size_var(), 2 );
    assert_eq!( f.forward(0, vec![ 7.0 ]).unwrap(), vec![ 7.0 ] );
    assert_eq!( f.reverse(0, vec![ 1.0 ]).unwrap(), vec![ 1.0 ] );
    //
    // multiplying by an identical zero yields a constant
    let ax = start_recording( vec![ 3.0f64 ] ).unwrap();
    let ay = &ax[0] * &0f64;
    let mut f = stop_recording( vec![ ay ] ).unwrap();
    assert_eq!( f.forward(0, vec![ 7.0 ]).unwrap(), vec![ 0.0 ] );
    assert_eq!( f.reverse(0, vec![ 1.0 ]).unwrap(), vec![ 0.0 ] );
}
