fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_ascii_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if ch.is_ascii_graphic() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Single-line logfmt warning for non-fatal anomalies (ledger write
/// failures, per-file copy errors during archiving). Goes to stderr so
/// command output stays parseable.
pub fn emit(code: &str, stage: &str, path: &str, err: &str) {
    eprintln!(
        "VERSKEEP_WARN code={} stage={} path={} err={}",
        sanitize_value(code),
        sanitize_value(stage),
        sanitize_value(path),
        sanitize_value(err),
    );
}
