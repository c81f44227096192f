//! Wide CSV export: one row per company, one column per figure and year
//! (`cifra_de_afaceri_neta_2023`, `salariati_2024`, ...).

use company_intel_core::model::Field;
use company_intel_core::{CompanyRecord, FinancialYear};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io::Read;
use std::str::FromStr;

/// What a single header maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Cif,
    Name,
    Caen,
    Judet,
    Amount(Field, i32),
    Employees(i32),
    Ignored,
}

const AMOUNT_PREFIXES: [(&str, Field); 12] = [
    ("cifra_de_afaceri_neta", Field::Revenue),
    ("profit_brut", Field::GrossProfit),
    ("pierdere_brut", Field::GrossLoss),
    ("profit_net", Field::NetProfit),
    ("pierdere_net", Field::NetLoss),
    ("venituri_totale", Field::TotalIncome),
    ("cheltuieli_totale", Field::TotalExpense),
    ("datorii", Field::Debt),
    ("creante", Field::Receivables),
    ("capitaluri_total", Field::Equity),
    ("active_imobilizate", Field::FixedAssets),
    ("active_imobilizante_total", Field::FixedAssets),
];

const EMPLOYEES_PREFIX: &str = "salariati";

fn classify_header(header: &str) -> Column {
    let header = header.trim();
    match header.to_ascii_lowercase().as_str() {
        "cif" => return Column::Cif,
        "company_name" => return Column::Name,
        "cod_caen" => return Column::Caen,
        "judet" => return Column::Judet,
        _ => {}
    }

    let Some((prefix, year)) = header.rsplit_once('_') else {
        return Column::Ignored;
    };
    let Ok(year) = year.parse::<i32>() else {
        return Column::Ignored;
    };
    if prefix == EMPLOYEES_PREFIX {
        return Column::Employees(year);
    }
    AMOUNT_PREFIXES
        .iter()
        .find(|(name, _)| *name == prefix)
        .map(|(_, field)| Column::Amount(*field, year))
        .unwrap_or(Column::Ignored)
}

fn parse_amount(cell: &str) -> Option<Result<Decimal, String>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    Some(
        Decimal::from_str(cell)
            .or_else(|_| Decimal::from_scientific(cell))
            .map_err(|_| format!("'{cell}' is not a number")),
    )
}

fn parse_employees(cell: &str) -> Option<Result<u32, String>> {
    parse_amount(cell).map(|parsed| {
        parsed.and_then(|value| {
            value
                .fract()
                .is_zero()
                .then(|| value.to_u32())
                .flatten()
                .ok_or_else(|| format!("'{}' is not a headcount", cell.trim()))
        })
    })
}

fn non_empty(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}

/// Parse every row into a [`CompanyRecord`]. Empty cells are missing values;
/// a non-numeric figure fails with its row and column named. Rows with an
/// empty CIF are skipped.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<CompanyRecord>, Box<dyn std::error::Error>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<(String, Column)> = csv_reader
        .headers()?
        .iter()
        .map(|h| (h.to_string(), classify_header(h)))
        .collect();
    if !columns.iter().any(|(_, c)| *c == Column::Cif) {
        return Err("CSV has no 'cif' column".into());
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (idx, row) in csv_reader.records().enumerate() {
        let row = row?;
        // header is line 1
        let line = idx + 2;
        let mut record = CompanyRecord::new(String::new());
        let mut years: BTreeMap<i32, FinancialYear> = BTreeMap::new();

        for ((header, column), cell) in columns.iter().zip(row.iter()) {
            let fail = |reason: String| format!("row {line}, column '{header}': {reason}");
            match *column {
                Column::Cif => record.cif = cell.trim().to_string(),
                Column::Name => record.name = non_empty(cell),
                Column::Caen => record.caen = non_empty(cell),
                Column::Judet => record.judet = non_empty(cell),
                Column::Amount(field, year) => {
                    if let Some(value) = parse_amount(cell) {
                        let value = value.map_err(fail)?;
                        years.entry(year).or_default().set(field, Some(value));
                    }
                }
                Column::Employees(year) => {
                    if let Some(value) = parse_employees(cell) {
                        years.entry(year).or_default().employees = Some(value.map_err(fail)?);
                    }
                }
                Column::Ignored => {}
            }
        }

        if record.cif.is_empty() {
            skipped += 1;
            continue;
        }
        years.retain(|_, data| !data.is_empty());
        record.years = years;
        records.push(record);
    }

    if skipped > 0 {
        tracing::warn!(skipped, "rows without CIF skipped");
    }
    tracing::debug!(companies = records.len(), columns = columns.len(), "parsed wide CSV");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
CIF,company_name,cod_caen,judet,cifra_de_afaceri_neta_2023,profit_net_2023,pierdere_net_2023,salariati_2023,datorii_2024,observatii
RO123,Eco Recycling SRL,\"3832,3811\",CLUJ,1500000.50,120000,,12,300000,ok
RO456,,4677,, ,,5000,0,,
";

    #[test]
    fn test_headers_classified() {
        assert_eq!(classify_header("cif"), Column::Cif);
        assert_eq!(classify_header("CIF"), Column::Cif);
        assert_eq!(
            classify_header("cifra_de_afaceri_neta_2023"),
            Column::Amount(Field::Revenue, 2023)
        );
        assert_eq!(classify_header("salariati_2013"), Column::Employees(2013));
        assert_eq!(
            classify_header("active_imobilizante_total_2024"),
            Column::Amount(Field::FixedAssets, 2024)
        );
        assert_eq!(classify_header("cifra_de_afaceri_neta"), Column::Ignored);
        assert_eq!(classify_header("adresa"), Column::Ignored);
    }

    #[test]
    fn test_parse_sample() {
        let records = parse_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.cif, "RO123");
        assert_eq!(first.name.as_deref(), Some("Eco Recycling SRL"));
        assert_eq!(first.caen.as_deref(), Some("3832,3811"));
        assert_eq!(first.judet.as_deref(), Some("CLUJ"));
        assert_eq!(first.revenue(2023), Some(dec!(1500000.50)));
        assert_eq!(first.net_profit(2023), dec!(120000));
        assert_eq!(first.employees(2023), Some(12));
        assert_eq!(first.amount(2024, Field::Debt), Some(dec!(300000)));

        let second = &records[1];
        assert_eq!(second.name, None);
        assert_eq!(second.judet, None);
        assert_eq!(second.revenue(2023), None);
        assert_eq!(second.net_profit(2023), dec!(-5000));
        assert_eq!(second.employees(2023), Some(0));
        assert!(second.year(2024).is_none());
    }

    #[test]
    fn test_non_numeric_cell_names_row_and_column() {
        let csv = "cif,cifra_de_afaceri_neta_2023\nRO1,100\nRO2,abc\n";
        let err = parse_records(csv.as_bytes()).unwrap_err().to_string();
        assert!(err.contains("row 3"), "{err}");
        assert!(err.contains("cifra_de_afaceri_neta_2023"), "{err}");
    }

    #[test]
    fn test_fractional_headcount_rejected() {
        let csv = "cif,salariati_2023\nRO1,2.5\n";
        assert!(parse_records(csv.as_bytes()).is_err());
        let csv = "cif,salariati_2023\nRO1,7.0\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].employees(2023), Some(7));
    }

    #[test]
    fn test_missing_cif_column() {
        let csv = "name,cifra_de_afaceri_neta_2023\nX,1\n";
        assert!(parse_records(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_blank_cif_rows_skipped() {
        let csv = "cif,cifra_de_afaceri_neta_2023\n,100\nRO9,5\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cif, "RO9");
    }
}
