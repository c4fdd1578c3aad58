//! Python identifiers and literals for generated modules.

/// `nextLink` -> `next_link`, `api-version` -> `api_version`,
/// `VNetPeering` -> `v_net_peering`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == '.' {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() {
            let prev = if i > 0 { chars.get(i - 1) } else { None };
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `list` -> `List`, `vnet-peering` -> `VnetPeering`.
pub fn to_class_name(name: &str) -> String {
    name.split(['-', '_', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Single-quoted Python string literal.
pub fn py_str(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Double-quoted Python string literal.
pub fn py_dq_str(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Text placed inside a `"""` docstring: backslashes are doubled and
/// embedded triple quotes escaped.
pub fn py_docstring(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

pub fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Renders `Class(...)` with one keyword argument per line, or `Class()`.
/// `indent` is the indentation of the line the call starts on.
pub fn py_call(class: &str, kwargs: &[String], indent: usize) -> String {
    if kwargs.is_empty() {
        return format!("{}()", class);
    }
    let pad = " ".repeat(indent + 4);
    let mut out = format!("{}(\n", class);
    for kw in kwargs {
        out.push_str(&pad);
        out.push_str(kw);
        out.push_str(",\n");
    }
    out.push_str(&" ".repeat(indent));
    out.push(')');
    out
}
