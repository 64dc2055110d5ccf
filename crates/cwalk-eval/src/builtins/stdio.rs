//! `stdio.h`: `printf` and `scanf`.

use std::io::{self, BufRead, Write};

use cwalk_util::{CwalkError, Result};

use super::{Arg, BuiltinCtx};
use crate::number::Number;

/// `printf(fmt, ...)`: formats to standard output and returns the
/// number of bytes written as an `int`.
///
/// Supported specifiers: `%d`, `%c`, `%f` (six decimals), `%s`, `%%`.
/// Escape sequences in the format string were already decoded by the
/// lexer. Surplus arguments are ignored, as in C.
pub(super) fn printf(ctx: &mut BuiltinCtx<'_>) -> Result<Number> {
    let line = ctx.line;
    let mut args = ctx.args.iter();

    let fmt = match args.next() {
        Some(Arg::Str(fmt)) => fmt.clone(),
        _ => {
            return Err(CwalkError::runtime(
                "printf requires a format string as its first argument",
                line,
            ));
        }
    };

    let mut out = String::new();
    let mut chars = fmt.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('%') => out.push('%'),
            Some('d') => {
                let value = next_number(&mut args, "%d", line)?;
                out.push_str(&value.to_i64().to_string());
            }
            Some('c') => {
                let value = next_number(&mut args, "%c", line)?;
                out.push((value.to_i64() as u8) as char);
            }
            Some('f') => {
                let value = next_number(&mut args, "%f", line)?;
                out.push_str(&format!("{:.6}", value.to_f64()));
            }
            Some('s') => match args.next() {
                Some(Arg::Str(s)) => out.push_str(s),
                _ => {
                    return Err(CwalkError::runtime(
                        "printf: %s expects a string argument",
                        line,
                    ));
                }
            },
            Some(other) => {
                return Err(CwalkError::runtime(
                    format!("printf: unsupported format specifier '%{}'", other),
                    line,
                ));
            }
            None => {
                return Err(CwalkError::runtime(
                    "printf: format string ends in '%'",
                    line,
                ));
            }
        }
    }

    write_all(ctx, out.as_bytes())?;
    Ok(Number::Int(out.len() as i64))
}

/// `scanf(fmt, &a, &b, ...)`: reads from standard input per the format
/// specifiers, stores each converted value into the named caller
/// variable, and returns the count of successful conversions.
///
/// Supported conversions: `%d`, `%f`, `%lf`, `%c`. Conversion stops at
/// the first token that fails to parse or at end of input, as in C.
pub(super) fn scanf(ctx: &mut BuiltinCtx<'_>) -> Result<Number> {
    let line = ctx.line;
    let mut args = ctx.args.iter();

    let fmt = match args.next() {
        Some(Arg::Str(fmt)) => fmt.clone(),
        _ => {
            return Err(CwalkError::runtime(
                "scanf requires a format string as its first argument",
                line,
            ));
        }
    };

    let mut converted = 0i64;
    let mut chars = fmt.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }

        let mut spec = chars.next().ok_or_else(|| {
            CwalkError::runtime("scanf: format string ends in '%'", line)
        })?;
        let mut long = false;
        if spec == 'l' {
            long = true;
            spec = chars.next().ok_or_else(|| {
                CwalkError::runtime("scanf: format string ends in '%l'", line)
            })?;
        }

        let target = match args.next() {
            Some(Arg::Ref(name)) => name.clone(),
            _ => {
                return Err(CwalkError::runtime(
                    format!("scanf: '%{}' needs a matching '&' argument", spec),
                    line,
                ));
            }
        };

        let value = match spec {
            'd' => {
                let Some(token) = read_token(ctx.stdin).map_err(|e| io_error(e, line))? else {
                    break;
                };
                match token.parse::<i64>() {
                    Ok(v) => Number::Int(v),
                    Err(_) => break,
                }
            }
            'f' => {
                let Some(token) = read_token(ctx.stdin).map_err(|e| io_error(e, line))? else {
                    break;
                };
                match token.parse::<f64>() {
                    Ok(v) if long => Number::Double(v),
                    Ok(v) => Number::Float(v as f32),
                    Err(_) => break,
                }
            }
            'c' => {
                let Some(byte) = read_byte(ctx.stdin).map_err(|e| io_error(e, line))? else {
                    break;
                };
                Number::Char(byte)
            }
            other => {
                return Err(CwalkError::runtime(
                    format!("scanf: unsupported conversion '%{}'", other),
                    line,
                ));
            }
        };

        ctx.memory.set(&target, value, line)?;
        converted += 1;
    }

    Ok(Number::Int(converted))
}

fn next_number<'a>(
    args: &mut impl Iterator<Item = &'a Arg>,
    spec: &str,
    line: u32,
) -> Result<Number> {
    match args.next() {
        Some(Arg::Num(value)) => Ok(*value),
        _ => Err(CwalkError::runtime(
            format!("printf: {} expects a numeric argument", spec),
            line,
        )),
    }
}

fn write_all(ctx: &mut BuiltinCtx<'_>, bytes: &[u8]) -> Result<()> {
    let line = ctx.line;
    ctx.stdout.write_all(bytes).map_err(|e| io_error(e, line))?;
    ctx.stdout.flush().map_err(|e| io_error(e, line))
}

fn io_error(error: io::Error, line: u32) -> CwalkError {
    CwalkError::runtime(format!("standard I/O failed: {}", error), line)
}

/// Skips whitespace, then reads one whitespace-delimited token.
/// Returns `None` at end of input.
fn read_token(stdin: &mut dyn BufRead) -> io::Result<Option<String>> {
    skip_whitespace(stdin)?;

    let mut token = Vec::new();
    loop {
        let buf = stdin.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        let taken = buf
            .iter()
            .take_while(|b| !b.is_ascii_whitespace())
            .count();
        token.extend_from_slice(&buf[..taken]);
        let len = buf.len();
        stdin.consume(taken);
        if taken < len {
            break;
        }
    }

    if token.is_empty() {
        Ok(None)
    } else {
        Ok(Some(String::from_utf8_lossy(&token).into_owned()))
    }
}

/// Skips whitespace, then reads a single byte. Returns `None` at end
/// of input.
fn read_byte(stdin: &mut dyn BufRead) -> io::Result<Option<u8>> {
    skip_whitespace(stdin)?;

    let buf = stdin.fill_buf()?;
    if buf.is_empty() {
        return Ok(None);
    }
    let byte = buf[0];
    stdin.consume(1);
    Ok(Some(byte))
}

fn skip_whitespace(stdin: &mut dyn BufRead) -> io::Result<()> {
    loop {
        let buf = stdin.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }
        let skipped = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
        let len = buf.len();
        stdin.consume(skipped);
        if skipped < len {
            return Ok(());
        }
    }
}
