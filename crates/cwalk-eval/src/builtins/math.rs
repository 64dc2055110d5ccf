//! `math.h`: double-valued math functions.

use cwalk_util::{CwalkError, Result};

use super::{Arg, BuiltinCtx};
use crate::number::Number;

fn arg_f64(ctx: &BuiltinCtx<'_>, idx: usize, name: &str) -> Result<f64> {
    match ctx.args.get(idx) {
        Some(Arg::Num(value)) => Ok(value.to_f64()),
        _ => Err(CwalkError::runtime(
            format!("{}: argument {} must be numeric", name, idx + 1),
            ctx.line,
        )),
    }
}

fn arity(ctx: &BuiltinCtx<'_>, expected: usize, name: &str) -> Result<()> {
    if ctx.args.len() == expected {
        Ok(())
    } else {
        Err(CwalkError::runtime(
            format!(
                "{} expects {} argument(s), got {}",
                name,
                expected,
                ctx.args.len()
            ),
            ctx.line,
        ))
    }
}

pub(super) fn sqrt(ctx: &mut BuiltinCtx<'_>) -> Result<Number> {
    arity(ctx, 1, "sqrt")?;
    let x = arg_f64(ctx, 0, "sqrt")?;
    if x < 0.0 {
        return Err(CwalkError::runtime("sqrt of a negative value", ctx.line));
    }
    Ok(Number::Double(x.sqrt()))
}

pub(super) fn pow(ctx: &mut BuiltinCtx<'_>) -> Result<Number> {
    arity(ctx, 2, "pow")?;
    let base = arg_f64(ctx, 0, "pow")?;
    let exp = arg_f64(ctx, 1, "pow")?;
    Ok(Number::Double(base.powf(exp)))
}

pub(super) fn fabs(ctx: &mut BuiltinCtx<'_>) -> Result<Number> {
    arity(ctx, 1, "fabs")?;
    Ok(Number::Double(arg_f64(ctx, 0, "fabs")?.abs()))
}

pub(super) fn floor(ctx: &mut BuiltinCtx<'_>) -> Result<Number> {
    arity(ctx, 1, "floor")?;
    Ok(Number::Double(arg_f64(ctx, 0, "floor")?.floor()))
}

pub(super) fn ceil(ctx: &mut BuiltinCtx<'_>) -> Result<Number> {
    arity(ctx, 1, "ceil")?;
    Ok(Number::Double(arg_f64(ctx, 0, "ceil")?.ceil()))
}
