use serde::{Deserialize, Serialize};

/// Column type inferred from the raw text values of a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
        }
    }

    /// Widen a type so both observed values fit (Integer < Float < Text).
    fn widen(self, other: ColumnType) -> ColumnType {
        use ColumnType::*;
        match (self, other) {
            (Integer, Integer) => Integer,
            (Text, _) | (_, Text) => Text,
            _ => Float,
        }
    }

    fn of_value(value: &str) -> ColumnType {
        if value.parse::<i64>().is_ok() {
            ColumnType::Integer
        } else if value.parse::<f64>().is_ok() {
            ColumnType::Float
        } else {
            ColumnType::Text
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
}

/// Typed descriptor of a loaded table, produced by a best-effort inference
/// pass over the raw string cells. Column order matches the source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Infer per-column types from string records. Empty cells mark a column
    /// nullable and do not participate in type selection; a column with no
    /// non-empty values falls back to Text.
    pub fn infer<'a, I>(headers: &[String], rows: I) -> TableSchema
    where
        I: IntoIterator<Item = &'a csv::StringRecord>,
    {
        let mut types: Vec<Option<ColumnType>> = vec![None; headers.len()];
        let mut nullable = vec![false; headers.len()];

        for record in rows {
            for (idx, value) in record.iter().enumerate().take(headers.len()) {
                if value.is_empty() {
                    nullable[idx] = true;
                    continue;
                }
                let observed = ColumnType::of_value(value);
                types[idx] = Some(match types[idx] {
                    Some(current) => current.widen(observed),
                    None => observed,
                });
            }
        }

        let columns = headers
            .iter()
            .zip(types.iter().zip(nullable.iter()))
            .map(|(name, (column_type, nullable))| ColumnDescriptor {
                name: name.clone(),
                column_type: column_type.unwrap_or(ColumnType::Text),
                nullable: *nullable,
            })
            .collect();

        TableSchema { columns }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(values.to_vec())
    }

    #[test]
    fn test_infer_basic_types() {
        let headers = vec!["id".to_string(), "name".to_string(), "value".to_string()];
        let rows = vec![record(&["1", "Aruba", "27.5"]), record(&["2", "Chad", "31"])];

        let schema = TableSchema::infer(&headers, &rows);

        assert_eq!(schema.column("id").unwrap().column_type, ColumnType::Integer);
        assert_eq!(schema.column("name").unwrap().column_type, ColumnType::Text);
        // "31" alone is integral, but the column saw "27.5" too
        assert_eq!(schema.column("value").unwrap().column_type, ColumnType::Float);
    }

    #[test]
    fn test_infer_nullable_and_empty_column() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let rows = vec![record(&["1", ""]), record(&["", ""])];

        let schema = TableSchema::infer(&headers, &rows);

        let a = schema.column("a").unwrap();
        assert_eq!(a.column_type, ColumnType::Integer);
        assert!(a.nullable);

        let b = schema.column("b").unwrap();
        assert_eq!(b.column_type, ColumnType::Text);
        assert!(b.nullable);
    }

    #[test]
    fn test_widen_to_text() {
        let headers = vec!["mixed".to_string()];
        let rows = vec![record(&["3.2"]), record(&["n/a"])];

        let schema = TableSchema::infer(&headers, &rows);
        assert_eq!(schema.column("mixed").unwrap().column_type, ColumnType::Text);
    }
}
