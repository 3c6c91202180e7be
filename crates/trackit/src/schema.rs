//! `trackit schema` - print the attribute catalogue

use trackit_client::Attribute;

/// One line per attribute: path, `*` when required, required children
pub fn print() {
    for line in lines() {
        println!("{line}");
    }
}

fn lines() -> Vec<String> {
    Attribute::ALL
        .iter()
        .map(|attribute| {
            let depth = attribute.path().1.len();
            let marker = if attribute.is_required() { "*" } else { " " };
            let mut line = format!(
                "{marker} {}{}",
                "  ".repeat(depth),
                attribute.dotted_path()
            );

            let required = attribute.required_children();
            if !required.is_empty() {
                let names: Vec<&str> = required.iter().map(|a| a.name()).collect();
                line.push_str(&format!("  (requires: {})", names.join(", ")));
            }
            line
        })
        .collect()
}
