// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// An atomic function, norm squared, with forward, reverse, and sparsity
// callbacks, recorded inside a larger function.
//
use std::sync::Arc;
//
use adtape::{
    AD, AdType, Atomic, ListPattern, Pattern, call_atomic,
    register_atomic, start_recording, stop_recording,
};
use adtape::tape::IndexT;
//
// NormSq
/// y = x0 * x0 + ... + x_{n-1} * x_{n-1}
struct NormSq {
    n : usize,
}
impl Atomic<f64> for NormSq {
    //
    fn name(&self) -> &str {
        "norm_sq"
    }
    fn n_res(&self) -> usize {
        1
    }
    //
    fn forward(
        &self,
        _call_id  : IndexT,
        _need_y   : &[bool],
        order_low : usize,
        order_up  : usize,
        _type_x   : &[AdType],
        taylor_x  : &[f64],
        taylor_y  : &mut [f64],
    ) -> bool {
        let n_ord = order_up + 1;
        for k in order_low ..= order_up {
            let mut yk = 0.0;
            for j in 0 .. self.n {
                for a in 0 ..= k {
                    yk += taylor_x[j * n_ord + a]
                        * taylor_x[j * n_ord + (k - a)];
                }
            }
            taylor_y[k] = yk;
        }
        true
    }
    //
    fn reverse(
        &self,
        _call_id  : IndexT,
        order_up  : usize,
        taylor_x  : &[f64],
        _taylor_y : &[f64],
        partial_x : &mut [f64],
        partial_y : &[f64],
    ) -> bool {
        let n_ord = order_up + 1;
        for j in 0 .. self.n {
            for a in 0 .. n_ord {
                for k in a .. n_ord {
                    partial_x[j * n_ord + a] +=
                        2.0 * partial_y[k] * taylor_x[j * n_ord + (k - a)];
                }
            }
        }
        true
    }
    //
    fn jac_sparsity(
        &self,
        _call_id   : IndexT,
        _dependency : bool,
    ) -> Option<ListPattern> {
        let mut pattern = ListPattern::new(1, self.n);
        for j in 0 .. self.n {
            pattern.add_element(0, j);
        }
        Some( pattern )
    }
    //
    fn hes_sparsity(&self, _call_id : IndexT) -> Option<ListPattern> {
        let mut pattern = ListPattern::new(self.n, self.n);
        for j in 0 .. self.n {
            pattern.add_element(j, j);
        }
        Some( pattern )
    }
}
//
#[test]
fn atomic_norm_sq() {
    let atom_id = register_atomic::<f64>( Arc::new( NormSq { n : 2 } ) );
    //
    // f(x) = norm_sq(x0, 2 * x1)
    let ax = start_recording( vec![ 3.0f64, 2.0 ] ).unwrap();
    let au : Vec< AD<f64> > = vec![ ax[0], &ax[1] * &2f64 ];
    let ay = call_atomic(atom_id, 0, &au).unwrap();
    let mut f = stop_recording(ay).unwrap();
    //
    // y = x0^2 + 4 x1^2
    let y = f.forward(0, vec![ 3.0, 2.0 ]).unwrap();
    assert_eq!( y, vec![ 25.0 ] );
    //
    let y1 = f.forward(1, vec![ 1.0, 0.0 ]).unwrap();
    assert_eq!( y1, vec![ 6.0 ] );
    let y2 = f.forward(2, vec![ 0.0, 0.0 ]).unwrap();
    assert_eq!( y2, vec![ 1.0 ] );
    //
    let dw = f.reverse(0, vec![ 1.0 ]).unwrap();
    assert_eq!( dw, vec![ 6.0, 16.0 ] );
    //
    // second order reverse: weight the first order coefficient of y
    let dw = f.reverse(1, vec![ 0.0, 1.0 ]).unwrap();
    assert_eq!( dw[0], 2.0 );   // d y1 / d x0_0 = 2 x0_1
    assert_eq!( dw[1], 6.0 );   // d y1 / d x0_1 = 2 x0_0
    //
    // sparsity through the callbacks
    let mut eye = ListPattern::new(2, 2);
    eye.add_element(0, 0);
    eye.add_element(1, 1);
    let jac = f.for_jac_sparsity(&eye, false, false).unwrap();
    assert_eq!( jac.row(0), vec![0, 1] );
    let hes : ListPattern =
        f.for_hes_sparsity( &[true, true], &[true] ).unwrap();
    assert_eq!( hes.row(0), vec![0] );
    assert_eq!( hes.row(1), vec![1] );
    //
    // the call survives the optimizer
    f.optimize();
    assert_eq!( f.forward(0, vec![ 3.0, 2.0 ]).unwrap(), vec![ 25.0 ] );
    assert_eq!( f.reverse(0, vec![ 1.0 ]).unwrap(), vec![ 6.0, 16.0 ] );
}
