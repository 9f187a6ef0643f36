pub mod config;
pub mod error;
pub mod options;
pub mod schema;

pub use config::DatabaseConfig;
pub use error::{Result, SchemaError};
pub use options::{CoercionMode, DEFAULT_TABLE, LoadOptions};
pub use schema::{ColumnDef, ColumnType, FillPolicy, SchemaContract, yellow_tripdata};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_rejects_duplicates() {
        let columns = vec![
            ColumnDef::new("id", ColumnType::Integer),
            ColumnDef::new("ID", ColumnType::Float),
        ];
        let error = SchemaContract::new(columns).unwrap_err();
        assert!(matches!(error, SchemaError::DuplicateColumn(name) if name == "ID"));
    }

    #[test]
    fn contract_rejects_empty() {
        let error = SchemaContract::new(Vec::new()).unwrap_err();
        assert!(matches!(error, SchemaError::Empty));
    }

    #[test]
    fn config_serializes() {
        let config = DatabaseConfig::new("db.example.com", "secret").with_dbname("taxi");
        let json = serde_json::to_string(&config).expect("serialize config");
        let round: DatabaseConfig = serde_json::from_str(&json).expect("deserialize config");
        assert_eq!(round.host, "db.example.com");
        assert_eq!(round.dbname, "taxi");
        assert_eq!(round.port, 5432);
    }
}
