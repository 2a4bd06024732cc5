use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use super::aggregator::{format_amount, AggregatedIngredient};
use super::classifier::{classify, group_by_section};

/// Offline list grouped by the local classifier, in the same markdown shape
/// the refinement provider is asked for.
pub fn render_sectioned_list(items: &[AggregatedIngredient]) -> String {
    let mut out = Vec::new();
    for (section, members) in group_by_section(items) {
        out.push(format!("## {}", section));
        out.extend(members.iter().map(|item| format!("- {}", item.display_line())));
        out.push(String::new());
    }
    // No blank line after the last section.
    out.pop();
    out.join("\n")
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    section: &'static str,
    name: &'a str,
    amount: String,
    unit: &'a str,
}

pub fn write_csv<W: Write>(writer: W, items: &[AggregatedIngredient]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for item in items {
        wtr.serialize(CsvRow {
            section: classify(&item.name).as_str(),
            name: &item.name,
            amount: format_amount(item.amount),
            unit: &item.unit,
        })
        .with_context(|| format!("Failed to write CSV row for '{}'", item.name))?;
    }
    // serialize() only emits the header with the first row.
    if items.is_empty() {
        wtr.write_record(["section", "name", "amount", "unit"])?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn write_csv_file(path: &Path, items: &[AggregatedIngredient]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file '{}'", path.display()))?;
    write_csv(file, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn item(name: &str, amount: f64, unit: &str) -> AggregatedIngredient {
        AggregatedIngredient { name: name.to_string(), amount, unit: unit.to_string() }
    }

    #[test]
    fn rendered_list_has_all_section_headers() {
        let text = render_sectioned_list(&[item("baby spinach", 2.0, "cups"), item("quinoa", 1.0, "cup")]);
        let expected = "## Produce\n- 2 cups baby spinach\n\n## Dairy\n\n## Meat/Poultry\n\n## Bakery\n\n## Pantry\n\n## Other\n- 1 cup quinoa";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_list_still_renders_headers() {
        let text = render_sectioned_list(&[]);
        assert_eq!(text.matches("## ").count(), 6);
        assert!(text.ends_with("## Other"));
    }

    #[test]
    fn csv_rows_carry_section() -> Result<()> {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[item("cheddar cheese", 1.5, "cups"), item("eggs", 3.0, "")])?;
        let text = String::from_utf8(buffer)?;
        assert_eq!(
            text,
            "section,name,amount,unit\nDairy,cheddar cheese,1.5,cups\nDairy,eggs,3,\n"
        );
        Ok(())
    }

    #[test]
    fn csv_for_empty_list_is_header_only() -> Result<()> {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[])?;
        assert_eq!(String::from_utf8(buffer)?, "section,name,amount,unit\n");
        Ok(())
    }

    #[test]
    fn csv_file_round_trip() -> Result<()> {
        let file = NamedTempFile::new()?;
        write_csv_file(file.path(), &[item("lemon", 2.0, "")])?;
        let text = std::fs::read_to_string(file.path())?;
        assert!(text.contains("Produce,lemon,2,"));
        Ok(())
    }
}
