//! Schema contract behavior tests.

use taxi_model::{ColumnDef, ColumnType, FillPolicy, SchemaContract, yellow_tripdata};

#[test]
fn yellow_tripdata_layout() {
    let contract = yellow_tripdata();
    assert_eq!(contract.len(), 18);
    let names = contract.column_names();
    assert_eq!(names.first(), Some(&"vendorid"));
    assert_eq!(names.last(), Some(&"congestion_surcharge"));
    // Order is authoritative for both DDL and bulk transfer.
    assert_eq!(names[3], "passenger_count");
    assert_eq!(names[9], "payment_type");
}

#[test]
fn yellow_tripdata_policies() {
    let contract = yellow_tripdata();
    let passenger = contract.column("passenger_count").expect("column exists");
    assert!(!passenger.nullable);
    assert_eq!(passenger.fill, FillPolicy::Numeric(0.0));

    let surcharge = contract
        .column("congestion_surcharge")
        .expect("column exists");
    assert!(!surcharge.required);

    let vendor = contract.column("vendorid").expect("column exists");
    assert!(vendor.matches("VendorID"));
    assert!(vendor.matches("vendorid"));
    assert!(!vendor.matches("vendor"));
}

#[test]
fn ddl_lists_columns_in_order() {
    let contract = SchemaContract::new(vec![
        ColumnDef::new("id", ColumnType::Integer),
        ColumnDef::new("ts", ColumnType::Timestamp),
        ColumnDef::new("amount", ColumnType::Float),
        ColumnDef::new("flag", ColumnType::Text),
    ])
    .expect("valid contract");
    let ddl = contract.ddl();
    let id_pos = ddl.find("id").expect("id in ddl");
    let ts_pos = ddl.find("ts ").expect("ts in ddl");
    assert!(id_pos < ts_pos);
    assert!(ddl.contains("INTEGER"));
    assert!(ddl.contains("TIMESTAMP"));
    assert!(ddl.contains("DOUBLE PRECISION"));
    assert!(ddl.contains("TEXT"));
}
