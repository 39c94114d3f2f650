// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Jacobian and Hessian sparsity patterns, both representations, and the
// dependency variant.
//
use adtape::{
    ADFun, ListPattern, PackPattern, Pattern, cond_exp_lt,
    start_recording, stop_recording,
};
//
// record_mixed
// f(x) = [ x0 * x1 + sin(x2), x2 ]
fn record_mixed() -> ADFun<f64> {
    let ax = start_recording( vec![ 1.0f64, 1.0, 1.0 ] ).unwrap();
    let ay = vec![
        &( &ax[0] * &ax[1] ) + &ax[2].sin(),
        ax[2],
    ];
    stop_recording(ay).unwrap()
}
//
// identity
fn identity<P : Pattern>(n : usize) -> P {
    let mut eye = P::new(n, n);
    for j in 0 .. n {
        eye.add_element(j, j);
    }
    eye
}
//
#[test]
fn jacobian_sparsity() {
    let f = record_mixed();
    //
    let jac = f.for_jac_sparsity(
        &identity::<ListPattern>(3), false, false,
    ).unwrap();
    assert_eq!( jac.row(0), vec![0, 1, 2] );
    assert_eq!( jac.row(1), vec![2] );
    //
    // reverse agrees; its output rows are the columns of the Jacobian
    let rev = f.rev_jac_sparsity(
        &identity::<ListPattern>(2), false, false,
    ).unwrap();
    assert_eq!( rev.n_row(), 2 );
    assert_eq!( rev.row(0), vec![0, 1, 2] );
    assert_eq!( rev.row(1), vec![2] );
    //
    // the packed representation agrees with the list representation
    let pack = f.for_jac_sparsity(
        &identity::<PackPattern>(3), false, false,
    ).unwrap();
    for i in 0 .. 2 {
        assert_eq!( pack.row(i), jac.row(i) );
    }
    //
    // transposed output
    let jac_t = f.for_jac_sparsity(
        &identity::<ListPattern>(3), true, false,
    ).unwrap();
    assert_eq!( jac_t.n_row(), 3 );
    assert_eq!( jac_t.row(0), vec![0] );
    assert_eq!( jac_t.row(2), vec![0, 1] );
}
//
#[test]
fn jacobian_sparsity_sound() {
    // (1, 0) is not in the pattern: varying x0 leaves y1 unchanged
    let mut f = record_mixed();
    let jac = f.for_jac_sparsity(
        &identity::<ListPattern>(3), false, false,
    ).unwrap();
    assert!( ! jac.is_element(1, 0) );
    let y_a = f.forward(0, vec![ 1.0, 2.0, 3.0 ]).unwrap();
    let y_b = f.forward(0, vec![ -5.0, 2.0, 3.0 ]).unwrap();
    assert_eq!( y_a[1], y_b[1] );
}
//
#[test]
fn hessian_sparsity() {
    let f = record_mixed();
    // Hessian of y0 + y1: x0 x1 cross terms and the sin(x2) diagonal
    let hes : ListPattern =
        f.for_hes_sparsity( &[true; 3], &[true; 2] ).unwrap();
    assert_eq!( hes.row(0), vec![1] );
    assert_eq!( hes.row(1), vec![0] );
    assert_eq!( hes.row(2), vec![2] );
    //
    let rev : ListPattern =
        f.rev_hes_sparsity( &[true; 2], false ).unwrap();
    for i in 0 .. 3 {
        assert_eq!( rev.row(i), hes.row(i) );
    }
    //
    // selecting only the linear dependent empties the pattern
    let hes : ListPattern =
        f.for_hes_sparsity( &[true; 3], &[false, true] ).unwrap();
    assert_eq!( hes.count(), 0 );
}
//
#[test]
fn dependency_variant() {
    // y = if x0 < 2 { x1 } else { x1 }: no derivative through x0, but a
    // dependency edge through the comparison
    let ax   = start_recording( vec![ 1.0f64, 1.0 ] ).unwrap();
    let atwo = adtape::ad_from_value( 2f64 );
    let ay   = vec![ cond_exp_lt(&ax[0], &atwo, &ax[1], &ax[1]) ];
    let f    = stop_recording(ay).unwrap();
    //
    let jac = f.for_jac_sparsity(
        &identity::<ListPattern>(2), false, false,
    ).unwrap();
    assert_eq!( jac.row(0), vec![1] );
    //
    let dep = f.for_jac_sparsity(
        &identity::<ListPattern>(2), false, true,
    ).unwrap();
    assert_eq!( dep.row(0), vec![0, 1] );
}
