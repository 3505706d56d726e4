use super::*;
use crate::blueprint::IndexOptions;
use dt_db::DuckDbBackend;

fn index_count(db: &DuckDbBackend, name: &str) -> usize {
    db.query_count(&format!(
        "SELECT * FROM duckdb_indexes() WHERE index_name = '{name}'"
    ))
    .unwrap()
}

#[test]
fn test_table_name_applies_prefix() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, Some("acme_"));
    assert_eq!(schema.table_name("orders"), "acme_orders");
    assert_eq!(schema.table_name("staging.orders"), "staging.acme_orders");

    let plain = Schema::new(&db, None);
    assert_eq!(plain.table_name("orders"), "orders");
}

#[test]
fn test_create_statements_for_identity_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);
    let mut bp = Blueprint::new();
    bp.integer("id", true).primary(true).identity(true);
    bp.text("sku", Some(64)).nullable(false).comment("Stock keeping unit");

    let statements = schema.create_table_statements("products", &bp).unwrap();
    assert_eq!(
        statements[0],
        "CREATE SEQUENCE IF NOT EXISTS \"seq_products_id\" START 1"
    );
    assert!(statements[1].starts_with("CREATE TABLE \"products\""));
    assert!(statements[1].contains("DEFAULT nextval('seq_products_id')"));
    assert!(statements[1].contains("PRIMARY KEY (\"id\")"));
    assert_eq!(
        statements[2],
        "COMMENT ON COLUMN \"products\".\"sku\" IS 'Stock keeping unit'"
    );
}

#[test]
fn test_new_table_with_identity_and_timestamps() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, Some("acme_"));

    schema
        .new_table("products", |t| {
            t.integer("id", true).primary(true).identity(true);
            t.text("sku", Some(64)).nullable(false);
            t.boolean("active").default(true);
            t.timestamps();
        })
        .unwrap();

    assert!(schema.table_exists("products").unwrap());
    assert!(db.relation_exists("acme_products").unwrap());

    db.execute("INSERT INTO acme_products (sku) VALUES ('A-1'), ('A-2')")
        .unwrap();
    assert_eq!(
        db.query_count("SELECT * FROM acme_products WHERE id IN (1, 2) AND active AND created_at IS NOT NULL")
            .unwrap(),
        2
    );
    assert_eq!(
        db.query_count(
            "SELECT * FROM duckdb_columns() WHERE table_name = 'acme_products' \
             AND column_name = 'created_at' AND comment = 'Creation Timestamp'"
        )
        .unwrap(),
        1
    );
}

#[test]
fn test_not_null_is_enforced() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);
    schema
        .new_table("notes", |t| {
            t.text("body", None).nullable(false);
        })
        .unwrap();
    assert!(db.execute("INSERT INTO notes VALUES (NULL)").is_err());
}

#[test]
fn test_table_creates_then_alters() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);

    schema
        .table("notes", |t| {
            t.text("body", Some(10));
        })
        .unwrap();
    db.execute("INSERT INTO notes VALUES ('hello')").unwrap();

    schema
        .table("notes", |t| {
            t.text("body", None);
            t.integer("priority", false).nullable(false).default(3);
        })
        .unwrap();

    assert!(db.column_exists("notes", "priority").unwrap());
    assert_eq!(
        db.query_count("SELECT * FROM notes WHERE priority = 3").unwrap(),
        1
    );
    assert!(db.execute("INSERT INTO notes VALUES ('x', NULL)").is_err());
}

#[test]
fn test_alter_statements_change_existing_column() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE notes (body VARCHAR)").unwrap();
    let schema = Schema::new(&db, None);

    let mut bp = Blueprint::new();
    bp.text("body", Some(255)).nullable(true);
    let statements = schema.alter_table_statements("notes", &bp).unwrap();
    assert_eq!(
        statements,
        vec![
            "ALTER TABLE \"notes\" ALTER COLUMN \"body\" SET DATA TYPE VARCHAR(255)",
            "ALTER TABLE \"notes\" ALTER COLUMN \"body\" DROP DEFAULT",
            "ALTER TABLE \"notes\" ALTER COLUMN \"body\" DROP NOT NULL",
        ]
    );
}

#[test]
fn test_alter_with_foreign_key_not_supported() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE orders (customer_id INTEGER)")
        .unwrap();
    let schema = Schema::new(&db, None);

    let err = schema
        .alter_table("orders", |t| {
            t.add_foreign_key("FK_ORDER_CUSTOMER", "customer_id", "customer", "id", None);
        })
        .unwrap_err();
    assert!(matches!(
        err,
        MigrateError::Db(DbError::NotImplemented { .. })
    ));
}

#[test]
fn test_foreign_key_on_new_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);
    schema
        .new_table("customer", |t| {
            t.integer("id", false).primary(true);
        })
        .unwrap();
    schema
        .new_table("orders", |t| {
            t.integer("id", false).primary(true);
            t.integer("customer_id", false);
            t.add_foreign_key("FK_ORDER_CUSTOMER", "customer_id", "customer", "id", None);
        })
        .unwrap();

    db.execute("INSERT INTO customer VALUES (1)").unwrap();
    db.execute("INSERT INTO orders VALUES (1, 1)").unwrap();
    assert!(db.execute("INSERT INTO orders VALUES (2, 99)").is_err());
}

#[test]
fn test_cascade_delete_not_supported() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);
    let mut bp = Blueprint::new();
    bp.integer("customer_id", false);
    bp.add_foreign_key(
        "FK_ORDER_CUSTOMER",
        "customer_id",
        "customer",
        "id",
        Some(ForeignKeyAction::Cascade),
    );
    assert!(schema.create_table_statements("orders", &bp).is_err());
}

#[test]
fn test_empty_blueprint_rejected() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);
    let err = schema.new_table("empty", |_| {}).unwrap_err();
    assert!(matches!(err, MigrateError::InvalidDefinition(_)));
}

#[test]
fn test_index_name_generation() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, Some("acme_"));
    assert_eq!(
        schema.index_name("products", &["sku", "store_id"], IndexKind::Index),
        "IDX_ACME_PRODUCTS_SKU_STORE_ID"
    );
    assert_eq!(
        schema.index_name("staging.products", &["sku"], IndexKind::Unique),
        "UNQ_ACME_PRODUCTS_SKU"
    );

    let long = schema.index_name(
        "catalog_product_entity_varchar_attribute_values",
        &["attribute_id", "store_id", "entity_id"],
        IndexKind::Unique,
    );
    assert!(long.starts_with("UNQ_"));
    assert_eq!(long.len(), 4 + 32);
    // stable across calls
    assert_eq!(
        long,
        schema.index_name(
            "catalog_product_entity_varchar_attribute_values",
            &["attribute_id", "store_id", "entity_id"],
            IndexKind::Unique,
        )
    );
}

#[test]
fn test_add_and_drop_index() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);
    schema
        .new_table("products", |t| {
            t.text("sku", None);
        })
        .unwrap();

    let name = schema
        .add_index("products", &["sku"], IndexKind::Unique)
        .unwrap();
    assert_eq!(name, "UNQ_PRODUCTS_SKU");
    assert_eq!(index_count(&db, &name), 1);

    db.execute("INSERT INTO products VALUES ('A')").unwrap();
    assert!(db.execute("INSERT INTO products VALUES ('A')").is_err());

    schema
        .drop_index("products", &["sku"], IndexKind::Unique)
        .unwrap();
    assert_eq!(index_count(&db, &name), 0);
}

#[test]
fn test_blueprint_indexes_created_with_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);
    schema
        .new_table("products", |t| {
            t.text("sku", None);
            t.add_index("IDX_PRODUCTS_SKU", &["sku"], IndexOptions::default());
        })
        .unwrap();
    assert_eq!(index_count(&db, "IDX_PRODUCTS_SKU"), 1);
}

#[test]
fn test_drop_column_and_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);
    schema
        .new_table("notes", |t| {
            t.text("body", None);
            t.text("legacy", None);
        })
        .unwrap();

    schema.drop_column("notes", "legacy").unwrap();
    assert!(!db.column_exists("notes", "legacy").unwrap());

    schema.drop_table("notes").unwrap();
    assert!(!schema.table_exists("notes").unwrap());
    // dropping a missing table is fine
    schema.drop_table("notes").unwrap();
}

#[test]
fn test_drop_foreign_key_not_supported() {
    let db = DuckDbBackend::in_memory().unwrap();
    let schema = Schema::new(&db, None);
    let err = schema.drop_foreign_key("orders", "FK_X").unwrap_err();
    assert!(err.to_string().contains("D004"));
}
