//! Tabular CSV export building.
//!
//! One header row of field names, one row per record. Values containing
//! commas, quotes, or newlines are quoted so free-text fields (descriptions,
//! audit details) survive the dump.

/// Build a CSV document from a header and row values.
pub fn build_csv<'a, I, R>(header: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    push_row(&mut out, header.iter().copied());
    for row in rows {
        push_row(&mut out, row);
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape(field));
    }
    out.push('\n');
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_comes_first() {
        let csv = build_csv(&["asset_id", "name"], vec![vec!["A1", "Printer"]]);
        assert_eq!(csv, "asset_id,name\nA1,Printer\n");
    }

    #[test]
    fn one_row_per_record() {
        let csv = build_csv(
            &["asset_id"],
            vec![vec!["A1"], vec!["A2"], vec!["A3"]],
        );
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn values_with_commas_are_quoted() {
        let csv = build_csv(&["details"], vec![vec!["cost updated, net_block recomputed"]]);
        assert_eq!(csv, "details\n\"cost updated, net_block recomputed\"\n");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = build_csv(&["name"], vec![vec![r#"24" monitor"#]]);
        assert_eq!(csv, "name\n\"24\"\" monitor\"\n");
    }
}
