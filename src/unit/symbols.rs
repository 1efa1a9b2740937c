//! Symbol rendering: Unicode superscript exponents and the ASCII ("keyboard") normal form used for
//! every symbol lookup and comparison.

/// Substitutions applied by [`to_keyboard_chars`]. Characters not listed map to themselves.
const KEYBOARD_TABLE: &[(char, &str)] = &[
    ('\u{2070}', "0"),
    ('\u{00B9}', "1"),
    ('\u{00B2}', "2"),
    ('\u{00B3}', "3"),
    ('\u{2074}', "4"),
    ('\u{2075}', "5"),
    ('\u{2076}', "6"),
    ('\u{2077}', "7"),
    ('\u{2078}', "8"),
    ('\u{2079}', "9"),
    ('\u{207B}', "-"),
    ('\u{22C5}', "*"), // dot operator
    ('\u{00B7}', "*"), // middle dot
    ('\u{00B0}', "deg"),
    ('\u{03A9}', "ohm"), // greek capital omega
    ('\u{2126}', "ohm"), // ohm sign
    ('\u{2127}', "mho"),
    ('\u{03BC}', "u"), // greek small mu
    ('\u{00B5}', "u"), // micro sign
    ('\u{03C7}', "chi"),
    ('\u{1D63}', "r"),
    ('\u{209A}', "p"),
    ('\u{1D68}', "g"),
    ('\u{00C5}', "Ao"), // latin capital A with ring
    ('\u{212B}', "Ao"), // angstrom sign
    ('\u{2082}', "2"),
    ('\u{2080}', "0"),
    ('\u{03B3}', "gamma"),
];

pub fn to_keyboard_chars(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    for c in symbol.chars() {
        match KEYBOARD_TABLE.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Renders the digits and minus sign of a decimal string as superscripts; other characters
/// (the decimal point) pass through.
pub fn numbers_to_superscript(decimal: &str) -> String {
    decimal
        .chars()
        .map(|c| match c {
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4'..='9' => char::from_u32(0x2070 + c as u32 - '0' as u32).unwrap_or(c),
            '-' => '\u{207B}',
            other => other,
        })
        .collect()
}

/// A normalized symbol that visibly encodes a power, product or quotient (`m2`, `kg*m`, `m/s`).
pub fn is_composite_symbol(keyboard_symbol: &str) -> bool {
    keyboard_symbol.chars().any(|c| c.is_ascii_digit() || c == '*' || c == '/')
}
