use crate::foundation::ids::Label;
use crate::graph::node::Node;

// Escaped inside a single argument (option-parser level).
const ARG_SPECIAL: &[char] = &['\\', '\'', '=', ':'];
// Escaped in the whole `name=args` string (graph-parser level).
const GRAPH_SPECIAL: &[char] = &['\\', '\'', '[', ']', ',', ';'];

/// Backslash-escape every char of `s` found in `special`.
pub(crate) fn escape_chars(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `name` or `name=pos1:pos2:key=value`, options sorted by key.
///
/// Options rendering to an empty string are dropped.
pub(crate) fn filter_spec(node: &Node, escape: bool) -> String {
    let arg = |s: String| {
        if escape {
            escape_chars(&s, ARG_SPECIAL)
        } else {
            s
        }
    };

    let args = node.args();
    let mut params: Vec<String> = args
        .positional
        .iter()
        .map(|v| arg(v.render()))
        .collect();
    for (k, v) in &args.options {
        let v = v.render();
        if v.is_empty() {
            continue;
        }
        params.push(format!("{}={}", arg(k.clone()), arg(v)));
    }

    let spec = if params.is_empty() {
        node.filter().to_string()
    } else {
        format!("{}={}", node.filter(), params.join(":"))
    };
    if escape {
        escape_chars(&spec, GRAPH_SPECIAL)
    } else {
        spec
    }
}

/// Append `[in]...spec[out]...` to `out`.
pub(crate) fn write_node(out: &mut String, inputs: &[Label], spec: &str, outputs: &[Label]) {
    for l in inputs {
        out.push('[');
        out.push_str(l.as_str());
        out.push(']');
    }
    out.push_str(spec);
    for l in outputs {
        out.push('[');
        out.push_str(l.as_str());
        out.push(']');
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/render.rs"]
mod tests;
