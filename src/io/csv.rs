use csv::{ReaderBuilder, Writer};
use std::fs::File;
use std::path::Path;

use crate::column::Column;
use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::na::NA;

/// Read a CSV file into a DataFrame
///
/// Each column gets the narrowest type all of its non-empty cells parse as:
/// Int64, then Float64, then Boolean, otherwise String. Empty cells are NA;
/// a column with no non-empty cell becomes Float64.
pub fn read_csv<P: AsRef<Path>>(path: P, has_header: bool) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut headers: Vec<String> = if has_header {
        rdr.headers()?.iter().map(|h| h.to_string()).collect()
    } else {
        Vec::new()
    };

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    let mut row_count = 0;
    for result in rdr.records() {
        let record = result?;
        // without a header the widest record decides the column count
        while headers.len() < record.len() && !has_header {
            headers.push(format!("column_{}", headers.len()));
            raw.push(vec![String::new(); row_count]);
        }
        for (i, cells) in raw.iter_mut().enumerate() {
            cells.push(record.get(i).unwrap_or("").to_string());
        }
        row_count += 1;
    }

    let mut df = DataFrame::new();
    for (header, cells) in headers.into_iter().zip(raw) {
        df.add_column(header, infer_column(&cells))?;
    }
    Ok(df)
}

fn infer_column(cells: &[String]) -> Column {
    let present = || cells.iter().filter(|c| !c.is_empty());

    if present().all(|c| c.parse::<i64>().is_ok()) && present().next().is_some() {
        return Column::Int64(parse_cells(cells, |c| c.parse().ok()));
    }
    if present().all(|c| c.parse::<f64>().is_ok()) {
        return Column::Float64(parse_cells(cells, |c| c.parse().ok()));
    }
    if present().all(|c| parse_bool(c).is_some()) {
        return Column::Boolean(parse_cells(cells, parse_bool));
    }
    Column::String(parse_cells(cells, |c| Some(c.to_string())))
}

fn parse_cells<T>(cells: &[String], parse: impl Fn(&str) -> Option<T>) -> Vec<NA<T>> {
    cells
        .iter()
        .map(|c| if c.is_empty() { NA::NA } else { parse(c).into() })
        .collect()
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Write a DataFrame to a CSV file; NA cells are written empty
pub fn write_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(df.column_names())?;

    for row in 0..df.row_count() {
        let mut record = Vec::with_capacity(df.column_count());
        for name in df.column_names() {
            record.push(df.column(name)?.cell_string(row)?);
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
