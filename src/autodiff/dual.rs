//! Forward-mode automatic differentiation over dual numbers
//!
//! A [`Dual`] carries a value together with its partial derivatives with
//! respect to a fixed ordering of unknowns. Every arithmetic operation
//! combines value and derivative vectors with the usual differentiation
//! rules, so evaluating an expression once yields its full gradient.
//!
//! Operands of different derivative widths combine transparently: a plain
//! number enters the computation as a zero-derivative dual, and the missing
//! trailing components are treated as zero.

use std::ops::{Add, Div, Mul, Neg, Sub};

/// A value paired with its partial derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct Dual {
    pub value: f64,
    pub derivs: Vec<f64>,
}

impl Dual {
    /// A constant: zero derivative with respect to every unknown.
    pub fn constant(value: f64) -> Self {
        Self {
            value,
            derivs: Vec::new(),
        }
    }

    /// The unknown at `index` in a system of `width` unknowns: derivative 1
    /// with respect to itself, 0 elsewhere.
    pub fn variable(value: f64, index: usize, width: usize) -> Self {
        let mut derivs = vec![0.0; width];
        if index < width {
            derivs[index] = 1.0;
        }
        Self { value, derivs }
    }

    /// Partial derivative with respect to the unknown at `index`.
    ///
    /// Components beyond the stored width are zero (constants carry an
    /// empty derivative vector).
    pub fn deriv(&self, index: usize) -> f64 {
        self.derivs.get(index).copied().unwrap_or(0.0)
    }

    fn map_derivs(&self, f: impl Fn(f64) -> f64) -> Vec<f64> {
        self.derivs.iter().map(|d| f(*d)).collect()
    }

    /// Combine two derivative vectors component-wise, padding the shorter
    /// one with zeros.
    fn zip_derivs(&self, other: &Dual, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        let width = self.derivs.len().max(other.derivs.len());
        (0..width).map(|i| f(self.deriv(i), other.deriv(i))).collect()
    }

    pub fn sin(&self) -> Dual {
        Dual {
            value: self.value.sin(),
            derivs: self.map_derivs(|d| d * self.value.cos()),
        }
    }

    pub fn cos(&self) -> Dual {
        Dual {
            value: self.value.cos(),
            derivs: self.map_derivs(|d| -d * self.value.sin()),
        }
    }

    pub fn tan(&self) -> Dual {
        let sec2 = 1.0 / (self.value.cos() * self.value.cos());
        Dual {
            value: self.value.tan(),
            derivs: self.map_derivs(|d| d * sec2),
        }
    }

    pub fn asin(&self) -> Dual {
        let slope = 1.0 / (1.0 - self.value * self.value).sqrt();
        Dual {
            value: self.value.asin(),
            derivs: self.map_derivs(|d| d * slope),
        }
    }

    pub fn acos(&self) -> Dual {
        let slope = -1.0 / (1.0 - self.value * self.value).sqrt();
        Dual {
            value: self.value.acos(),
            derivs: self.map_derivs(|d| d * slope),
        }
    }

    pub fn atan(&self) -> Dual {
        let slope = 1.0 / (1.0 + self.value * self.value);
        Dual {
            value: self.value.atan(),
            derivs: self.map_derivs(|d| d * slope),
        }
    }

    pub fn exp(&self) -> Dual {
        let value = self.value.exp();
        Dual {
            value,
            derivs: self.map_derivs(|d| d * value),
        }
    }

    pub fn sqrt(&self) -> Dual {
        let value = self.value.sqrt();
        Dual {
            value,
            derivs: self.map_derivs(|d| d / (2.0 * value)),
        }
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Dual {
        Dual {
            value: self.value.ln(),
            derivs: self.map_derivs(|d| d / self.value),
        }
    }

    /// Raise to an integer power: `d/dx x^n = n * x^(n-1) * x'`.
    pub fn powi(&self, n: i32) -> Dual {
        let slope = f64::from(n) * self.value.powi(n - 1);
        Dual {
            value: self.value.powi(n),
            derivs: self.map_derivs(|d| d * slope),
        }
    }

    /// General power, restricted to constant integer exponents.
    ///
    /// A non-integer or non-constant exponent still produces the correct
    /// value, but its derivatives are NaN. This mirrors the documented
    /// limitation of the power rule used here; constraint templates only
    /// ever generate integer exponents.
    pub fn pow(&self, exponent: &Dual) -> Dual {
        let exponent_is_constant = exponent.derivs.iter().all(|d| *d == 0.0);
        if exponent_is_constant
            && exponent.value.fract() == 0.0
            && exponent.value.abs() <= f64::from(i32::MAX)
        {
            return self.powi(exponent.value as i32);
        }
        Dual {
            value: self.value.powf(exponent.value),
            derivs: vec![f64::NAN; self.derivs.len().max(exponent.derivs.len())],
        }
    }
}

impl Add for &Dual {
    type Output = Dual;

    fn add(self, rhs: Self) -> Dual {
        Dual {
            value: self.value + rhs.value,
            derivs: self.zip_derivs(rhs, |a, b| a + b),
        }
    }
}

impl Sub for &Dual {
    type Output = Dual;

    fn sub(self, rhs: Self) -> Dual {
        Dual {
            value: self.value - rhs.value,
            derivs: self.zip_derivs(rhs, |a, b| a - b),
        }
    }
}

impl Mul for &Dual {
    type Output = Dual;

    /// Product rule: `(uv)' = u'v + uv'`
    fn mul(self, rhs: Self) -> Dual {
        Dual {
            value: self.value * rhs.value,
            derivs: self.zip_derivs(rhs, |a, b| a * rhs.value + self.value * b),
        }
    }
}

impl Div for &Dual {
    type Output = Dual;

    /// Quotient rule: `(u/v)' = (u'v - uv') / v^2`
    fn div(self, rhs: Self) -> Dual {
        let denom = rhs.value * rhs.value;
        Dual {
            value: self.value / rhs.value,
            derivs: self.zip_derivs(rhs, |a, b| (a * rhs.value - self.value * b) / denom),
        }
    }
}

impl Neg for &Dual {
    type Output = Dual;

    fn neg(self) -> Dual {
        Dual {
            value: -self.value,
            derivs: self.map_derivs(|d| -d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_variable_is_one_hot() {
        let x = Dual::variable(3.0, 1, 3);
        assert_eq!(x.derivs, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_product_rule() {
        // f = x * y at (x, y) = (3, 4): df/dx = 4, df/dy = 3
        let x = Dual::variable(3.0, 0, 2);
        let y = Dual::variable(4.0, 1, 2);
        let f = &x * &y;
        assert!(approx_eq(f.value, 12.0));
        assert!(approx_eq(f.deriv(0), 4.0));
        assert!(approx_eq(f.deriv(1), 3.0));
    }

    #[test]
    fn test_quotient_rule() {
        // f = x / y at (6, 2): df/dx = 1/2, df/dy = -6/4
        let x = Dual::variable(6.0, 0, 2);
        let y = Dual::variable(2.0, 1, 2);
        let f = &x / &y;
        assert!(approx_eq(f.value, 3.0));
        assert!(approx_eq(f.deriv(0), 0.5));
        assert!(approx_eq(f.deriv(1), -1.5));
    }

    #[test]
    fn test_chain_rule_through_sin() {
        // f = sin(2x) at x = 0.5: df/dx = 2 cos(1)
        let x = Dual::variable(0.5, 0, 1);
        let two = Dual::constant(2.0);
        let f = (&two * &x).sin();
        assert!(approx_eq(f.value, 1.0_f64.sin()));
        assert!(approx_eq(f.deriv(0), 2.0 * 1.0_f64.cos()));
    }

    #[test]
    fn test_sqrt_derivative() {
        let x = Dual::variable(4.0, 0, 1);
        let f = x.sqrt();
        assert!(approx_eq(f.value, 2.0));
        assert!(approx_eq(f.deriv(0), 0.25));
    }

    #[test]
    fn test_integer_power() {
        // f = x^3 at x = 2: f' = 3 * 4 = 12
        let x = Dual::variable(2.0, 0, 1);
        let f = x.powi(3);
        assert!(approx_eq(f.value, 8.0));
        assert!(approx_eq(f.deriv(0), 12.0));
    }

    #[test]
    fn test_non_integer_exponent_has_nan_derivatives() {
        let x = Dual::variable(2.0, 0, 1);
        let exponent = Dual::constant(0.5);
        let f = x.pow(&exponent);
        assert!(approx_eq(f.value, 2.0_f64.sqrt()));
        assert!(f.deriv(0).is_nan());
    }

    #[test]
    fn test_constant_promotes_transparently() {
        // A width-0 constant combines with a width-2 variable
        let x = Dual::variable(5.0, 1, 2);
        let c = Dual::constant(10.0);
        let f = &c - &x;
        assert!(approx_eq(f.value, 5.0));
        assert!(approx_eq(f.deriv(0), 0.0));
        assert!(approx_eq(f.deriv(1), -1.0));
    }

    #[test]
    fn test_negation() {
        let x = Dual::variable(2.0, 0, 1);
        let f = -&x;
        assert!(approx_eq(f.value, -2.0));
        assert!(approx_eq(f.deriv(0), -1.0));
    }
}
