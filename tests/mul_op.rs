// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Two variable product: values, derivatives, and sparsity.
//
use adtape::{
    ListPattern, PackPattern, Pattern, start_recording, stop_recording,
};
//
#[test]
fn mul_forward_reverse() {
    let _ = env_logger::builder().is_test(true).try_init();
    //
    // f(x) = x0 * x1
    let x : Vec<f64> = vec![ 3.0, 5.0 ];
    let ax           = start_recording(x).unwrap();
    let ay           = vec![ &ax[0] * &ax[1] ];
    let mut f        = stop_recording(ay).unwrap();
    assert_eq!( f.domain_len(), 2 );
    assert_eq!( f.range_len(),  1 );
    //
    let y0 = f.forward(0, vec![ 3.0, 5.0 ]).unwrap();
    assert_eq!( y0, vec![ 15.0 ] );
    //
    let y1 = f.forward(1, vec![ 1.0, 0.0 ]).unwrap();
    assert_eq!( y1, vec![ 5.0 ] );
    //
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    assert_eq!( dw, vec![ 5.0, 3.0 ] );
    //
    // second order: weight the first order coefficient of y
    let dw = f.reverse(1, vec![ 0.0, 1.0 ]).unwrap();
    assert_eq!( dw[0], 0.0 );   // d y1 / d x0_0 = x1_1 = 0
    assert_eq!( dw[1], 5.0 );   // d y1 / d x0_1 = x1_0
    assert_eq!( dw[2], 1.0 );   // d y1 / d x1_0 = x0_1
    assert_eq!( dw[3], 3.0 );   // d y1 / d x1_1 = x0_0
    //
    let jac = f.jacobian( vec![ 3.0, 5.0 ] ).unwrap();
    assert_eq!( jac, vec![ 5.0, 3.0 ] );
    //
    let hes = f.hessian( vec![ 3.0, 5.0 ], vec![ 1.0 ] ).unwrap();
    assert_eq!( hes, vec![ 0.0, 1.0, 1.0, 0.0 ] );
}
//
#[test]
fn mul_sparsity() {
    let x : Vec<f64> = vec![ 3.0, 5.0 ];
    let ax           = start_recording(x).unwrap();
    let ay           = vec![ &ax[0] * &ax[1] ];
    let f            = stop_recording(ay).unwrap();
    //
    // Jacobian sparsity is the full pattern {(0,0), (0,1)}
    let mut eye = ListPattern::new(2, 2);
    eye.add_element(0, 0);
    eye.add_element(1, 1);
    let jac = f.for_jac_sparsity(&eye, false, false).unwrap();
    assert_eq!( jac.row(0), vec![0, 1] );
    //
    // Hessian sparsity is {(0,1), (1,0)}
    let hes : ListPattern =
        f.for_hes_sparsity( &[true, true], &[true] ).unwrap();
    assert_eq!( hes.row(0), vec![1] );
    assert_eq!( hes.row(1), vec![0] );
    //
    // the bit packed representation agrees
    let mut eye = PackPattern::new(2, 2);
    eye.add_element(0, 0);
    eye.add_element(1, 1);
    let jac = f.for_jac_sparsity(&eye, false, false).unwrap();
    assert_eq!( jac.row(0), vec![0, 1] );
    let hes : PackPattern =
        f.rev_hes_sparsity( &[true], false ).unwrap();
    assert_eq!( hes.row(0), vec![1] );
    assert_eq!( hes.row(1), vec![0] );
}
