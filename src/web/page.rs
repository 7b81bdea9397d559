const TEMPLATE: &str = include_str!("index.html");
const RESULT_SLOT: &str = "{{ result }}";

/// Render the form page with `result` shown in the result area.
pub fn render(result: &str) -> String {
    TEMPLATE.replace(RESULT_SLOT, &escape_html(result))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
