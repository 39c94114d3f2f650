// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//
//! LU factor and solve linear equations.
//!
//! Link to [parent module](super)
//!
//! Matrices are stored row major: element (i, j) of an n by n matrix is
//! at index `i * n + j` .
// ---------------------------------------------------------------------------
// use
//
use crate::utility::Scalar;
// ---------------------------------------------------------------------------
//
// lu_factor
/// In place LU factorization with partial pivoting on rows and columns.
///
/// * Syntax :
/// ```text
///     sign = lu_factor(&mut ip, &mut jp, &mut lu)
/// ```
///
/// * ip , jp :
/// on return, the row and column permutations; the input values do not
/// matter but the lengths must be n.
///
/// * lu :
/// on input the n by n matrix A; on return the LU factorization of the
/// permuted matrix.
///
/// * sign :
/// +1 or -1 when the permuted determinant is the determinant times sign;
/// 0 when the matrix is numerically singular.
pub fn lu_factor<S : Scalar>(
    ip : &mut [usize],
    jp : &mut [usize],
    lu : &mut [S],
) -> i32 {
    let n = ip.len();
    debug_assert_eq!( jp.len(), n );
    debug_assert_eq!( lu.len(), n * n );
    //
    for i in 0 .. n {
        ip[i] = i;
        jp[i] = i;
    }
    let mut sign = 1i32;
    //
    for p in 0 .. n {
        //
        // search the remaining sub matrix for the largest element
        let mut pivot_abs = S::zero();
        let mut pivot_i   = p;
        let mut pivot_j   = p;
        for i in p .. n {
            for j in p .. n {
                let element = lu[ ip[i] * n + jp[j] ].abs_val();
                if pivot_abs.less( &element ) {
                    pivot_abs = element;
                    pivot_i   = i;
                    pivot_j   = j;
                }
            }
        }
        if ! S::zero().less( &pivot_abs ) {
            return 0;
        }
        if pivot_i != p {
            ip.swap(p, pivot_i);
            sign = -sign;
        }
        if pivot_j != p {
            jp.swap(p, pivot_j);
            sign = -sign;
        }
        //
        // elimination
        let pivot = lu[ ip[p] * n + jp[p] ].clone();
        for i in (p + 1) .. n {
            let ratio =
                lu[ ip[i] * n + jp[p] ].clone() / pivot.clone();
            lu[ ip[i] * n + jp[p] ] = ratio.clone();
            for j in (p + 1) .. n {
                let sub = ratio.clone() * lu[ ip[p] * n + jp[j] ].clone();
                let val = lu[ ip[i] * n + jp[j] ].clone() - sub;
                lu[ ip[i] * n + jp[j] ] = val;
            }
        }
    }
    sign
}
// ---------------------------------------------------------------------------
//
// lu_invert
/// Solve, using a factorization from [lu_factor] , the equations
/// `A * X = B` ; B is n by m, stored row major, and is replaced by X.
pub fn lu_invert<S : Scalar>(
    ip : &[usize],
    jp : &[usize],
    lu : &[S],
    b  : &mut [S],
) {
    let n = ip.len();
    let m = b.len() / n;
    debug_assert_eq!( b.len(), n * m );
    //
    // forward substitution: L * Y = P * B
    for p in 0 .. n {
        for k in 0 .. m {
            let mut sum = b[ ip[p] * m + k ].clone();
            for q in 0 .. p {
                let term =
                    lu[ ip[p] * n + jp[q] ].clone()
                    * b[ ip[q] * m + k ].clone();
                sum = sum - term;
            }
            b[ ip[p] * m + k ] = sum;
        }
    }
    //
    // backward substitution: U * Z = Y
    for p in (0 .. n).rev() {
        for k in 0 .. m {
            let mut sum = b[ ip[p] * m + k ].clone();
            for q in (p + 1) .. n {
                let term =
                    lu[ ip[p] * n + jp[q] ].clone()
                    * b[ ip[q] * m + k ].clone();
                sum = sum - term;
            }
            b[ ip[p] * m + k ] =
                sum / lu[ ip[p] * n + jp[p] ].clone();
        }
    }
    //
    // undo the permutations: X[ jp[p] ] = Z[ ip[p] ]
    let z = b.to_vec();
    for p in 0 .. n {
        for k in 0 .. m {
            b[ jp[p] * m + k ] = z[ ip[p] * m + k ].clone();
        }
    }
}
// ---------------------------------------------------------------------------
//
// lu_solve
/// Factor and solve `A * X = B` in one call.
///
/// * Syntax :
/// ```text
///     (sign, x) = lu_solve(n, m, a, b)
/// ```
///
/// * sign :
/// the sign of the determinant of A, or 0 when A is numerically
/// singular (in which case x is empty).
///
/// # Example
/// ```
/// use adtape::utility::lu_solve;
/// let a = vec![ 0.0, 2.0,
///               1.0, 0.0 ];
/// let b = vec![ 4.0,
///               3.0 ];
/// let (sign, x) = lu_solve(2, 1, a, b);
/// assert_eq!( sign, -1 );
/// assert_eq!( x, vec![ 3.0, 2.0 ] );
/// ```
pub fn lu_solve<S : Scalar>(
    n : usize,
    m : usize,
    a : Vec<S>,
    b : Vec<S>,
) -> (i32, Vec<S>) {
    debug_assert_eq!( a.len(), n * n );
    debug_assert_eq!( b.len(), n * m );
    let mut ip = vec![ 0usize; n ];
    let mut jp = vec![ 0usize; n ];
    let mut lu   = a;
    let mut sign = lu_factor(&mut ip, &mut jp, &mut lu);
    if sign == 0 {
        return (0, Vec::new());
    }
    // account for the sign of each pivot
    for p in 0 .. n {
        if lu[ ip[p] * n + jp[p] ].less( &S::zero() ) {
            sign = -sign;
        }
    }
    let mut x = b;
    lu_invert(&ip, &jp, &lu, &mut x);
    (sign, x)
}
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    //
    #[test]
    fn solve_3_by_3() {
        // A = [ 2 0 1 ; 0 3 0 ; 1 0 2 ], det = 9
        let a = vec![
            2.0, 0.0, 1.0,
            0.0, 3.0, 0.0,
            1.0, 0.0, 2.0,
        ];
        let x_true: [f64; 3] = [ 1.0, -2.0, 3.0 ];
        let b = vec![
            2.0 * 1.0 + 1.0 * 3.0,
            3.0 * -2.0,
            1.0 * 1.0 + 2.0 * 3.0,
        ];
        let (sign, x) = lu_solve(3, 1, a, b);
        assert_eq!( sign, 1 );
        for i in 0 .. 3 {
            assert!( (x[i] - x_true[i]).abs() < 1e-12 );
        }
    }
}
