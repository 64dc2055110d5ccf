//! The typed numeric value model.
//!
//! Arithmetic follows C's usual conversions: if either operand is a
//! `double` the operation is done in `double`, else if either is a
//! `float` it is done in `float`, else in `int`. A `char` participates
//! in arithmetic as an `int`, so `char + char` is an `int`.
//!
//! `int` is a 64-bit two's-complement value and arithmetic wraps.
//! Division with two integral operands truncates toward zero; division
//! or remainder by zero is a runtime error. The bitwise operators and
//! shifts are defined on integral operands only. Comparisons and
//! logical negation produce an `int` 0 or 1.

use std::cmp::Ordering;

use cwalk_par::CType;
use cwalk_util::{CwalkError, Result};

/// A typed numeric value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    /// An 8-bit code point; promotes to `int` in arithmetic.
    Char(u8),
    Float(f32),
    Double(f64),
}

/// Operands after the usual arithmetic conversions.
enum Promoted {
    Int(i64, i64),
    Float(f32, f32),
    Double(f64, f64),
}

fn promote(lhs: Number, rhs: Number) -> Promoted {
    use Number::*;

    match (lhs, rhs) {
        (Double(_), _) | (_, Double(_)) => Promoted::Double(lhs.to_f64(), rhs.to_f64()),
        (Float(_), _) | (_, Float(_)) => Promoted::Float(lhs.to_f32(), rhs.to_f32()),
        _ => Promoted::Int(lhs.to_i64(), rhs.to_i64()),
    }
}

impl Number {
    /// The C type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Number::Int(_) => "int",
            Number::Char(_) => "char",
            Number::Float(_) => "float",
            Number::Double(_) => "double",
        }
    }

    /// True for `int` and `char` values.
    pub fn is_integral(&self) -> bool {
        matches!(self, Number::Int(_) | Number::Char(_))
    }

    /// C truthiness: nonzero is true.
    pub fn is_truthy(&self) -> bool {
        match *self {
            Number::Int(v) => v != 0,
            Number::Char(c) => c != 0,
            Number::Float(f) => f != 0.0,
            Number::Double(d) => d != 0.0,
        }
    }

    /// The value as an `i64`, truncating floating values toward zero.
    pub fn to_i64(self) -> i64 {
        match self {
            Number::Int(v) => v,
            Number::Char(c) => c as i64,
            Number::Float(f) => f as i64,
            Number::Double(d) => d as i64,
        }
    }

    pub fn to_f32(self) -> f32 {
        match self {
            Number::Int(v) => v as f32,
            Number::Char(c) => c as f32,
            Number::Float(f) => f,
            Number::Double(d) => d as f32,
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Char(c) => c as f64,
            Number::Float(f) => f as f64,
            Number::Double(d) => d,
        }
    }

    pub fn add(self, rhs: Number, _line: u32) -> Result<Number> {
        Ok(match promote(self, rhs) {
            Promoted::Int(l, r) => Number::Int(l.wrapping_add(r)),
            Promoted::Float(l, r) => Number::Float(l + r),
            Promoted::Double(l, r) => Number::Double(l + r),
        })
    }

    pub fn sub(self, rhs: Number, _line: u32) -> Result<Number> {
        Ok(match promote(self, rhs) {
            Promoted::Int(l, r) => Number::Int(l.wrapping_sub(r)),
            Promoted::Float(l, r) => Number::Float(l - r),
            Promoted::Double(l, r) => Number::Double(l - r),
        })
    }

    pub fn mul(self, rhs: Number, _line: u32) -> Result<Number> {
        Ok(match promote(self, rhs) {
            Promoted::Int(l, r) => Number::Int(l.wrapping_mul(r)),
            Promoted::Float(l, r) => Number::Float(l * r),
            Promoted::Double(l, r) => Number::Double(l * r),
        })
    }

    /// Division. Integral operands truncate toward zero; dividing by
    /// zero fails, integral or not.
    pub fn div(self, rhs: Number, line: u32) -> Result<Number> {
        match promote(self, rhs) {
            Promoted::Int(l, r) => {
                if r == 0 {
                    Err(CwalkError::runtime("division by zero", line))
                } else {
                    Ok(Number::Int(l.wrapping_div(r)))
                }
            }
            Promoted::Float(l, r) => {
                if r == 0.0 {
                    Err(CwalkError::runtime("division by zero", line))
                } else {
                    Ok(Number::Float(l / r))
                }
            }
            Promoted::Double(l, r) => {
                if r == 0.0 {
                    Err(CwalkError::runtime("division by zero", line))
                } else {
                    Ok(Number::Double(l / r))
                }
            }
        }
    }

    /// Remainder, defined on integral operands only.
    pub fn rem(self, rhs: Number, line: u32) -> Result<Number> {
        let (l, r) = self.integral_pair(rhs, "%", line)?;
        if r == 0 {
            Err(CwalkError::runtime("division by zero", line))
        } else {
            Ok(Number::Int(l.wrapping_rem(r)))
        }
    }

    pub fn bitand(self, rhs: Number, line: u32) -> Result<Number> {
        let (l, r) = self.integral_pair(rhs, "&", line)?;
        Ok(Number::Int(l & r))
    }

    pub fn bitor(self, rhs: Number, line: u32) -> Result<Number> {
        let (l, r) = self.integral_pair(rhs, "|", line)?;
        Ok(Number::Int(l | r))
    }

    pub fn bitxor(self, rhs: Number, line: u32) -> Result<Number> {
        let (l, r) = self.integral_pair(rhs, "^", line)?;
        Ok(Number::Int(l ^ r))
    }

    pub fn shl(self, rhs: Number, line: u32) -> Result<Number> {
        let (l, r) = self.integral_pair(rhs, "<<", line)?;
        if r < 0 {
            return Err(CwalkError::runtime("negative shift amount", line));
        }
        Ok(Number::Int(l.wrapping_shl(r as u32)))
    }

    pub fn shr(self, rhs: Number, line: u32) -> Result<Number> {
        let (l, r) = self.integral_pair(rhs, ">>", line)?;
        if r < 0 {
            return Err(CwalkError::runtime("negative shift amount", line));
        }
        Ok(Number::Int(l.wrapping_shr(r as u32)))
    }

    /// Both operands as `i64`, or a type error naming the operator.
    fn integral_pair(self, rhs: Number, op: &str, line: u32) -> Result<(i64, i64)> {
        if self.is_integral() && rhs.is_integral() {
            Ok((self.to_i64(), rhs.to_i64()))
        } else {
            Err(CwalkError::type_error(
                format!(
                    "invalid operands to '{}' ({} and {})",
                    op,
                    self.type_name(),
                    rhs.type_name()
                ),
                line,
            ))
        }
    }

    fn compare(self, rhs: Number) -> Option<Ordering> {
        match promote(self, rhs) {
            Promoted::Int(l, r) => Some(l.cmp(&r)),
            Promoted::Float(l, r) => l.partial_cmp(&r),
            Promoted::Double(l, r) => l.partial_cmp(&r),
        }
    }

    fn bool_int(value: bool) -> Number {
        Number::Int(value as i64)
    }

    pub fn lt(self, rhs: Number) -> Number {
        Self::bool_int(self.compare(rhs) == Some(Ordering::Less))
    }

    pub fn gt(self, rhs: Number) -> Number {
        Self::bool_int(self.compare(rhs) == Some(Ordering::Greater))
    }

    pub fn le(self, rhs: Number) -> Number {
        Self::bool_int(matches!(
            self.compare(rhs),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ))
    }

    pub fn ge(self, rhs: Number) -> Number {
        Self::bool_int(matches!(
            self.compare(rhs),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        ))
    }

    pub fn eq_num(self, rhs: Number) -> Number {
        Self::bool_int(self.compare(rhs) == Some(Ordering::Equal))
    }

    pub fn ne_num(self, rhs: Number) -> Number {
        Self::bool_int(self.compare(rhs) != Some(Ordering::Equal))
    }

    /// Arithmetic negation with type preservation; `char` negates as
    /// `int`.
    pub fn neg(self) -> Number {
        match self {
            Number::Int(v) => Number::Int(v.wrapping_neg()),
            Number::Char(c) => Number::Int(-(c as i64)),
            Number::Float(f) => Number::Float(-f),
            Number::Double(d) => Number::Double(-d),
        }
    }

    /// Logical negation: `int` 1 for a zero value, 0 otherwise.
    pub fn not(self) -> Number {
        Self::bool_int(!self.is_truthy())
    }

    /// Conversion to the named type. Floating values truncate toward
    /// zero on the way to an integral type; a `char` target keeps the
    /// low 8 bits.
    pub fn cast(self, ty: CType, line: u32) -> Result<Number> {
        match ty {
            CType::Char => Ok(Number::Char(self.to_i64() as u8)),
            CType::Int => Ok(Number::Int(self.to_i64())),
            CType::Float => Ok(Number::Float(self.to_f32())),
            CType::Double => Ok(Number::Double(self.to_f64())),
            CType::Void => Err(CwalkError::type_error("cannot cast to void", line)),
        }
    }
}
