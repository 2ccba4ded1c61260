//! The rendering rules shared by `print`, `string`, and the write actions

use std::fmt;

use super::{Payload, Value};

/// Format a number the way the language renders it: up to six significant
/// digits, trailing zeros stripped, scientific notation outside
/// `[1e-4, 1e6)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{:.5e}", n);
    let (mantissa, exp) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exp: i32 = match exp.parse() {
        Ok(e) => e,
        Err(_) => return sci,
    };

    if exp < -4 || exp >= 6 {
        let mantissa = trim_decimals(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        // Six significant digits total, so (5 - exp) places after the point.
        let decimals = (5 - exp).max(0) as usize;
        trim_decimals(&format!("{n:.decimals$}")).to_string()
    }
}

fn trim_decimals(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

impl Value {
    /// Append this value's standard rendering to `out`.
    ///
    /// Strings are copied byte for byte. Numbers use [`format_number`].
    /// Arrays and functions render as bracketed summaries rather than
    /// their contents; externals render as their identity.
    pub fn render_into(&self, out: &mut Vec<u8>) {
        match &*self.payload() {
            Payload::Nil => out.extend_from_slice(b"nil"),
            Payload::Number(n) => out.extend_from_slice(format_number(*n).as_bytes()),
            Payload::String(s) => out.extend_from_slice(s),
            Payload::Array(items) => {
                let summary = format!("[array passed and is {} elements long]", items.len());
                out.extend_from_slice(summary.as_bytes());
            }
            Payload::Function(f) => {
                let summary = format!("[function passed and it takes {} arguments]", f.arity());
                out.extend_from_slice(summary.as_bytes());
            }
            Payload::External(e) => {
                let summary = format!("[external passed at 0x{:x}]", e.addr());
                out.extend_from_slice(summary.as_bytes());
            }
        }
    }

    /// This value's standard rendering as fresh bytes.
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.render_into(&mut out);
        out
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.payload() {
            Payload::Nil => write!(f, "nil"),
            Payload::Number(n) => write!(f, "Number({n})"),
            Payload::String(s) => write!(f, "String({:?})", String::from_utf8_lossy(s)),
            Payload::Array(items) => {
                write!(f, "Array[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item:?}")?;
                }
                write!(f, "]")
            }
            Payload::Function(func) => write!(f, "<function/{}>", func.arity()),
            Payload::External(e) => write!(f, "<external 0x{:x}>", e.addr()),
        }
    }
}

impl fmt::Display for Value {
    /// The standard rendering, lossily decoded for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.render()))
    }
}
