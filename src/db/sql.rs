/// Splits a script of plain statements on `;`.
///
/// Segments holding nothing but whitespace or `--` comments are dropped.
/// Not suitable for scripts with dollar-quoted bodies.
pub fn split_statements(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(str::trim)
        .filter(|stmt| {
            stmt.lines()
                .map(str::trim)
                .any(|line| !line.is_empty() && !line.starts_with("--"))
        })
        .map(str::to_string)
        .collect()
}
