//! Operator-facing notices

/// Trait for displaying progress and messages
pub trait ProgressDisplay: Send + Sync {
    /// Display information message
    fn info(&self, message: &str);

    /// Display warning message
    fn warning(&self, message: &str);

    /// Display error message
    fn error(&self, message: &str);

    /// Display success message
    fn success(&self, message: &str);

    /// Display a two-column key/value table
    fn table(&self, rows: &[(&str, String)]);
}

/// Display writing to the terminal
pub struct TerminalDisplay;

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressDisplay for TerminalDisplay {
    fn info(&self, message: &str) {
        println!("ℹ️  {message}");
    }

    fn warning(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {message}");
    }

    fn success(&self, message: &str) {
        println!("✅ {message}");
    }

    fn table(&self, rows: &[(&str, String)]) {
        print!("{}", render_table(rows));
    }
}

/// Render rows as a boxed two-column table
pub fn render_table(rows: &[(&str, String)]) -> String {
    let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, v)| v.chars().count()).max().unwrap_or(0);
    let border = format!("+-{}-+-{}-+\n", "-".repeat(key_width), "-".repeat(value_width));

    let mut output = border.clone();
    for (key, value) in rows {
        output.push_str(&format!(
            "| {}{} | {}{} |\n",
            key,
            " ".repeat(key_width - key.chars().count()),
            value,
            " ".repeat(value_width - value.chars().count()),
        ));
    }
    output.push_str(&border);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_pads_columns() {
        let rows = [
            ("project", "web-app".to_string()),
            ("tag", "web-app_20240101_v01".to_string()),
        ];

        let rendered = render_table(&rows);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "+---------+----------------------+");
        assert_eq!(lines[1], "| project | web-app              |");
        assert_eq!(lines[2], "| tag     | web-app_20240101_v01 |");
        assert_eq!(lines[3], lines[0]);
    }

    #[test]
    fn test_render_table_empty() {
        assert_eq!(render_table(&[]), "+--+--+\n+--+--+\n");
    }
}
